#[cfg(test)]
mod integration_tests {
    use std::str::FromStr;

    use crate::handlers::barters::CreateBarterRequest;
    use crate::handlers::expenses::CreateExpenseRequest;
    use crate::handlers::intake::{CreateIntakeRequest, SetRatingRequest};
    use crate::handlers::projects::{CreateProjectRequest, UpdateProjectRequest};
    use crate::handlers::stages::{CreateStageRequest, UpdateStageRequest};
    use crate::test_utils::test_utils::setup_test_app;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::NaiveDate;
    use common::ApiResponse;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dec(value: &serde_json::Value) -> Decimal {
        Decimal::from_str(value.as_str().expect("expected decimal string")).unwrap()
    }

    async fn create_project(server: &TestServer, name: &str) -> i32 {
        let response = server
            .post("/api/v1/projects")
            .json(&CreateProjectRequest {
                name: name.to_string(),
                company: None,
            })
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        body.data["id"].as_i64().unwrap() as i32
    }

    fn stage_request(
        project_id: i32,
        value: i64,
        percent: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CreateStageRequest {
        CreateStageRequest {
            project_id,
            category: "Paving".to_string(),
            start_date: start,
            end_date: end,
            estimated_value: Decimal::from(value),
            percent_complete: Some(percent),
            status: Some("InProgress".to_string()),
        }
    }

    fn expense_request(
        project_id: i32,
        category: &str,
        value: i64,
        paid_on: NaiveDate,
    ) -> CreateExpenseRequest {
        CreateExpenseRequest {
            project_id,
            category: category.to_string(),
            description: None,
            value: Decimal::from(value),
            paid_on,
            status: None,
        }
    }

    fn intake_request(name: &str, phone: &str) -> CreateIntakeRequest {
        CreateIntakeRequest {
            name: name.to_string(),
            phone: phone.to_string(),
            email: None,
            city: Some("Sinop".to_string()),
            development: Some("Green Hills".to_string()),
            agent_name: None,
            was_assisted: false,
            visited_sales_office: true,
            consent_to_contact: true,
            interest_level: Some("high".to_string()),
            purchased_before: false,
            media_source: Some("instagram".to_string()),
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;
        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_project_crud_roundtrip() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let project_id = create_project(&server, "Green Hills").await;

        // Read it back
        let response = server.get(&format!("/api/v1/projects/{}", project_id)).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["name"], "Green Hills");
        assert_eq!(body.data["company"], "Own");

        // Update the company
        let response = server
            .put(&format!("/api/v1/projects/{}", project_id))
            .json(&UpdateProjectRequest {
                name: None,
                company: Some("Partner Ltd".to_string()),
            })
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["company"], "Partner Ltd");

        // Delete and verify it is gone
        let response = server
            .delete(&format!("/api/v1/projects/{}", project_id))
            .await;
        response.assert_status(StatusCode::OK);

        let response = server.get(&format!("/api/v1/projects/{}", project_id)).await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_project_rejects_empty_name() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/projects")
            .json(&CreateProjectRequest {
                name: "   ".to_string(),
                company: None,
            })
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["fields"][0], "name");
    }

    #[tokio::test]
    async fn test_stage_creation_journals_progress() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let project_id = create_project(&server, "Riverside").await;

        let response = server
            .post("/api/v1/stages")
            .json(&stage_request(
                project_id,
                50_000,
                25,
                date(2024, 1, 1),
                date(2024, 6, 30),
            ))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        let stage_id = body.data["id"].as_i64().unwrap();
        assert_eq!(body.data["category"], "Paving");

        // Creating the stage wrote the first snapshot
        let response = server
            .get(&format!("/api/v1/stages/{}/snapshots", stage_id))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["percent"], 25);

        // Updating the percentage appends another one
        let response = server
            .put(&format!("/api/v1/stages/{}", stage_id))
            .json(&UpdateStageRequest {
                category: None,
                start_date: None,
                end_date: None,
                estimated_value: None,
                percent_complete: Some(60),
                status: None,
            })
            .await;
        response.assert_status(StatusCode::OK);

        let response = server
            .get(&format!("/api/v1/stages/{}/snapshots", stage_id))
            .await;
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert_eq!(body.data.len(), 2);
        assert_eq!(body.data[1]["percent"], 60);
    }

    #[tokio::test]
    async fn test_stage_rejects_inverted_date_window() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let project_id = create_project(&server, "Riverside").await;

        let response = server
            .post("/api/v1/stages")
            .json(&stage_request(
                project_id,
                50_000,
                0,
                date(2024, 6, 1),
                date(2024, 1, 1),
            ))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        let fields = body["fields"].as_array().unwrap();
        assert!(fields.iter().any(|f| f == "end_date"));
    }

    #[tokio::test]
    async fn test_stage_rejects_percent_out_of_range() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let project_id = create_project(&server, "Riverside").await;

        let response = server
            .post("/api/v1/stages")
            .json(&stage_request(
                project_id,
                50_000,
                120,
                date(2024, 1, 1),
                date(2024, 6, 30),
            ))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["fields"][0], "percent_complete");
    }

    #[tokio::test]
    async fn test_stage_requires_existing_project() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/stages")
            .json(&stage_request(
                9_999,
                50_000,
                0,
                date(2024, 1, 1),
                date(2024, 6, 30),
            ))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_expense_requires_existing_project() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/expenses")
            .json(&expense_request(9_999, "Diesel", 1_000, date(2024, 2, 1)))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_expense_rejects_unknown_category() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let project_id = create_project(&server, "Riverside").await;

        let response = server
            .post("/api/v1/expenses")
            .json(&expense_request(project_id, "Catering", 1_000, date(2024, 2, 1)))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["fields"][0], "category");
    }

    #[tokio::test]
    async fn test_project_delete_cascades_to_children() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let project_id = create_project(&server, "Doomed").await;

        server
            .post("/api/v1/stages")
            .json(&stage_request(
                project_id,
                10_000,
                10,
                date(2024, 1, 1),
                date(2024, 3, 31),
            ))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post("/api/v1/expenses")
            .json(&expense_request(project_id, "Labor", 2_000, date(2024, 2, 1)))
            .await
            .assert_status(StatusCode::CREATED);

        server
            .delete(&format!("/api/v1/projects/{}", project_id))
            .await
            .assert_status(StatusCode::OK);

        let response = server
            .get(&format!("/api/v1/projects/{}/stages", project_id))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let response = server.get("/api/v1/expenses").await;
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert!(body.data.is_empty());
    }

    #[tokio::test]
    async fn test_intake_rejects_missing_name_and_phone() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/intake")
            .json(&intake_request("", "66 99999-8888"))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["fields"][0], "name");

        let response = server
            .post("/api/v1/intake")
            .json(&intake_request("Maria", "123"))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["fields"][0], "phone");
    }

    #[tokio::test]
    async fn test_intake_roundtrip_with_rating() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        // Webhook is unconfigured in tests; submission must still work.
        let response = server
            .post("/api/v1/intake")
            .json(&intake_request("Maria Souza", "(66) 99999-8888"))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        let submission_id = body.data["id"].as_i64().unwrap();
        assert_eq!(body.data["phone"], "+5566999998888");
        assert_eq!(body.data["rating"], 0);

        let response = server
            .put(&format!("/api/v1/intake/{}/rating", submission_id))
            .json(&SetRatingRequest { rating: 9 })
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["rating"], 9);

        let response = server.get("/api/v1/intake").await;
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert_eq!(body.data.len(), 1);
    }

    #[tokio::test]
    async fn test_intake_drops_agent_without_visit() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let mut request = intake_request("Carlos", "66 3531-1234");
        request.agent_name = Some("4083 - N. Pavan".to_string());
        request.was_assisted = false;

        let response = server.post("/api/v1/intake").json(&request).await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.data["agent_name"].is_null());
    }

    #[tokio::test]
    async fn test_project_budget_distributes_pro_rata() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let project_id = create_project(&server, "Green Hills").await;
        server
            .post("/api/v1/stages")
            .json(&stage_request(
                project_id,
                120_000,
                0,
                date(2024, 1, 1),
                date(2024, 12, 31),
            ))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .get(&format!("/api/v1/projects/{}/budget", project_id))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();

        assert_eq!(body.data.len(), 12);
        assert!(body.data.iter().all(|e| dec(&e["amount"]) == Decimal::from(10_000)));
        let cumulative_at_six: Decimal =
            body.data[..6].iter().map(|e| dec(&e["amount"])).sum();
        assert_eq!(cumulative_at_six, Decimal::from(60_000));
    }

    #[tokio::test]
    async fn test_curve_aligns_budget_and_spend() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let project_id = create_project(&server, "Green Hills").await;
        server
            .post("/api/v1/stages")
            .json(&stage_request(
                project_id,
                120_000,
                40,
                date(2024, 1, 1),
                date(2024, 12, 31),
            ))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post("/api/v1/expenses")
            .json(&expense_request(project_id, "Diesel", 30_000, date(2024, 2, 10)))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post("/api/v1/barters")
            .json(&CreateBarterRequest {
                project_id,
                description: Some("lot credit".to_string()),
                value: Decimal::from(10_000),
                traded_on: date(2024, 3, 5),
            })
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.get("/api/v1/analytics/curve").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();

        assert_eq!(body.data.len(), 12);
        let last = body.data.last().unwrap();
        assert_eq!(dec(&last["cumulative_budgeted"]), Decimal::from(120_000));
        assert_eq!(dec(&last["cumulative_actual"]), Decimal::from(40_000));
        // February carries the expense; March the barter.
        assert_eq!(dec(&body.data[1]["actual"]), Decimal::from(30_000));
        assert_eq!(dec(&body.data[2]["actual"]), Decimal::from(10_000));
    }

    #[tokio::test]
    async fn test_kpis_report_variance_status() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let project_id = create_project(&server, "Green Hills").await;
        server
            .post("/api/v1/stages")
            .json(&stage_request(
                project_id,
                120_000,
                40,
                date(2024, 1, 1),
                date(2099, 12, 31),
            ))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post("/api/v1/expenses")
            .json(&expense_request(project_id, "Diesel", 30_000, date(2024, 2, 10)))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post("/api/v1/barters")
            .json(&CreateBarterRequest {
                project_id,
                description: None,
                value: Decimal::from(10_000),
                traded_on: date(2024, 3, 5),
            })
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .get(&format!("/api/v1/analytics/kpis?project_id={}", project_id))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();

        assert_eq!(dec(&body.data["contract_total"]), Decimal::from(120_000));
        assert_eq!(dec(&body.data["balance"]), Decimal::from(80_000));
        // Deadline far in the future: nothing at risk yet.
        assert_eq!(dec(&body.data["risk_exposure"]), Decimal::ZERO);
        assert_eq!(dec(&body.data["variance"]["physical_pct"]), Decimal::from(40));
        assert_eq!(
            dec(&body.data["variance"]["financial_pct"]),
            Decimal::from_str("33.33").unwrap()
        );
        assert_eq!(body.data["variance"]["status"], "Efficient");
    }

    #[tokio::test]
    async fn test_risk_counts_overdue_stages_only() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let project_id = create_project(&server, "Late").await;
        let yesterday = chrono::Utc::now().date_naive().pred_opt().unwrap();

        // 50000 at 40%, deadline passed: 30000 exposed.
        server
            .post("/api/v1/stages")
            .json(&stage_request(project_id, 50_000, 40, date(2024, 1, 1), yesterday))
            .await
            .assert_status(StatusCode::CREATED);
        // Complete stage past deadline: not at risk.
        server
            .post("/api/v1/stages")
            .json(&stage_request(project_id, 80_000, 100, date(2024, 1, 1), yesterday))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.get("/api/v1/analytics/risk").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();

        let stages = body.data["stages"].as_array().unwrap();
        assert_eq!(stages.len(), 1);
        assert_eq!(dec(&stages[0]["pending_value"]), Decimal::from(30_000));
        assert_eq!(dec(&body.data["total_exposure"]), Decimal::from(30_000));
    }

    #[tokio::test]
    async fn test_pareto_top_five_plus_other() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let project_id = create_project(&server, "Costly").await;
        let paid_on = date(2024, 2, 1);
        let seed = [
            ("Materials", 1_000),
            ("Diesel", 2_000),
            ("Priming", 500),
            ("Emulsion", 100),
            ("CrushedStone", 50),
            ("Freight", 25),
            ("Electrical", 10),
        ];
        for (category, value) in seed {
            server
                .post("/api/v1/expenses")
                .json(&expense_request(project_id, category, value, paid_on))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server.get("/api/v1/analytics/pareto").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();

        assert_eq!(body.data.len(), 6);
        let order: Vec<&str> = body
            .data
            .iter()
            .map(|row| row["category"].as_str().unwrap())
            .collect();
        assert_eq!(
            order,
            ["Diesel", "Materials", "Priming", "Emulsion", "CrushedStone", "Other"]
        );
        assert_eq!(dec(&body.data[5]["value"]), Decimal::from(35));

        let last_share = dec(&body.data[5]["cumulative_share"]);
        assert!((Decimal::from(100) - last_share).abs() < Decimal::new(1, 2));
    }

    #[tokio::test]
    async fn test_progress_series_averages_same_day_updates() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let project_id = create_project(&server, "Tracked").await;
        // Two stages journal their percentage today on creation.
        server
            .post("/api/v1/stages")
            .json(&stage_request(project_id, 10_000, 40, date(2024, 1, 1), date(2099, 1, 1)))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post("/api/v1/stages")
            .json(&stage_request(project_id, 10_000, 60, date(2024, 1, 1), date(2099, 1, 1)))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.get("/api/v1/analytics/progress").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();

        assert_eq!(body.data.len(), 1);
        assert_eq!(dec(&body.data[0]["mean_percent"]), Decimal::from(50));
        assert_eq!(body.data[0]["project_name"], "Tracked");
    }

    #[tokio::test]
    async fn test_summary_lists_active_projects_only() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let active = create_project(&server, "Active").await;
        let _idle = create_project(&server, "Idle").await;

        server
            .post("/api/v1/stages")
            .json(&stage_request(active, 100_000, 50, date(2024, 1, 1), date(2099, 1, 1)))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post("/api/v1/expenses")
            .json(&expense_request(active, "Labor", 30_000, date(2024, 2, 1)))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.get("/api/v1/analytics/summary").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();

        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["name"], "Active");
        assert_eq!(dec(&body.data[0]["balance"]), Decimal::from(70_000));
        assert_eq!(dec(&body.data[0]["percent_paid"]), Decimal::from(30));
    }

    #[tokio::test]
    async fn test_projection_spreads_remaining_value() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let project_id = create_project(&server, "Forward").await;
        let today = chrono::Utc::now().date_naive();
        // Window already closed with half the value open: everything
        // lands on the current month.
        server
            .post("/api/v1/stages")
            .json(&stage_request(project_id, 10_000, 50, date(2024, 1, 1), date(2024, 2, 1)))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.get("/api/v1/analytics/projection").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();

        assert_eq!(body.data.len(), 1);
        assert_eq!(dec(&body.data[0]["amount"]), Decimal::from(5_000));
        let month = body.data[0]["month"].as_str().unwrap();
        assert!(month.starts_with(&today.format("%Y-%m").to_string()));
    }
}
