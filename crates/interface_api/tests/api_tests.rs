//! HTTP tests for the portfolio and tips API

use axum::http::StatusCode;
use axum_test::TestServer;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;

use domain_portfolio::SoldHoldingRetention;
use infra_store::{InMemoryPortfolioRepository, InMemoryTipRepository};
use interface_api::{config::ApiConfig, create_router, AppState};
use test_utils::{TestPortfolioBuilder, TestTipBuilder};

fn server_with(config: ApiConfig) -> TestServer {
    let state = AppState::in_memory(config).unwrap();
    TestServer::new(create_router(state)).unwrap()
}

fn server() -> TestServer {
    server_with(ApiConfig::default())
}

fn dec_field(value: &Value, field: &str) -> Decimal {
    match &value[field] {
        Value::String(s) => s.parse().unwrap(),
        other => panic!("field {} is not a decimal string: {:?}", field, other),
    }
}

async fn create_portfolio(server: &TestServer, name: &str, min_investment: &str) -> String {
    let response = server
        .post("/api/v1/portfolios")
        .json(&json!({ "name": name, "min_investment": min_investment }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

async fn add_infy(server: &TestServer, id: &str) -> Value {
    let response = server
        .post(&format!("/api/v1/portfolios/{}/holdings", id))
        .json(&json!({ "symbol": "infy", "sector": "IT", "weight": "25", "buy_price": "100" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let response = server().get("/health").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_reports_adapters() {
        let response = server().get("/health/ready").await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["status"], "ready");
        assert_eq!(body["adapters"].as_array().unwrap().len(), 2);
    }
}

mod portfolios {
    use super::*;

    #[tokio::test]
    async fn test_create_and_fetch() {
        let server = server();
        let id = create_portfolio(&server, "Core Growth", "10000").await;

        let response = server.get(&format!("/api/v1/portfolios/{}", id)).await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["name"], "Core Growth");
        assert_eq!(body["stage"], "new");
        assert_eq!(dec_field(&body, "cash_balance"), dec!(10000));
        assert_eq!(dec_field(&body, "base_capital"), dec!(10000));
    }

    #[tokio::test]
    async fn test_blank_name_is_unprocessable() {
        let response = server()
            .post("/api/v1/portfolios")
            .json(&json!({ "name": "", "min_investment": "1000" }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body = response.json::<Value>();
        assert_eq!(body["error"], "validation_error");
        assert!(body["details"][0].as_str().unwrap().starts_with("name"));
    }

    #[tokio::test]
    async fn test_negative_min_investment_is_unprocessable() {
        let response = server()
            .post("/api/v1/portfolios")
            .json(&json!({ "name": "Broke", "min_investment": "-1" }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let server = server();
        create_portfolio(&server, "Dividend", "5000").await;

        let response = server
            .post("/api/v1/portfolios")
            .json(&json!({ "name": "dividend", "min_investment": "5000" }))
            .await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_min_investment_moves_cash() {
        let server = server();
        let id = create_portfolio(&server, "Core", "10000").await;

        let response = server
            .put(&format!("/api/v1/portfolios/{}", id))
            .json(&json!({ "min_investment": "12000", "description": "Large caps" }))
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(dec_field(&body, "cash_balance"), dec!(12000));
        assert_eq!(body["description"], "Large caps");
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let server = server();
        let first = create_portfolio(&server, "First", "1000").await;
        create_portfolio(&server, "Second", "1000").await;

        let listed = server.get("/api/v1/portfolios").await.json::<Value>();
        assert_eq!(listed.as_array().unwrap().len(), 2);

        server
            .delete(&format!("/api/v1/portfolios/{}", first))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/api/v1/portfolios/{}", first))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_unknown_portfolio_is_not_found() {
        server()
            .get(&format!("/api/v1/portfolios/{}", uuid::Uuid::new_v4()))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_valuation_after_price_update() {
        let server = server();
        let id = create_portfolio(&server, "Valued", "10000").await;
        add_infy(&server, &id).await;

        server
            .put(&format!("/api/v1/portfolios/{}/holdings/INFY", id))
            .json(&json!({ "action": "hold", "current_price": "110" }))
            .await
            .assert_status_ok();

        let valuation = server
            .get(&format!("/api/v1/portfolios/{}/valuation", id))
            .await
            .json::<Value>();
        assert_eq!(dec_field(&valuation["market_value"], "amount"), dec!(2750));
        assert_eq!(dec_field(&valuation["unrealized_pnl"], "amount"), dec!(250));
        assert_eq!(dec_field(&valuation["total_value"], "amount"), dec!(10250));
    }

    #[tokio::test]
    async fn test_allocation_preview_does_not_mutate() {
        let server = server();
        let id = create_portfolio(&server, "Preview", "10000").await;

        let response = server
            .post(&format!("/api/v1/portfolios/{}/allocation-preview", id))
            .json(&json!({ "weight": "25", "buy_price": "100" }))
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["allocation"]["quantity"], 25);
        assert_eq!(body["affordable"], true);

        let portfolio = server.get(&format!("/api/v1/portfolios/{}", id)).await.json::<Value>();
        assert!(portfolio["holdings"].as_array().unwrap().is_empty());
    }
}

mod holdings {
    use super::*;

    #[tokio::test]
    async fn test_add_holding_allocates_whole_shares() {
        let server = server();
        let id = create_portfolio(&server, "Core", "10000").await;

        let body = add_infy(&server, &id).await;
        let portfolio = &body["portfolio"];
        assert_eq!(dec_field(portfolio, "cash_balance"), dec!(7500));
        assert_eq!(portfolio["stage"], "existing");
        assert_eq!(portfolio["holdings"][0]["symbol"], "INFY");
        assert_eq!(portfolio["holdings"][0]["quantity"], 25);
        assert_eq!(portfolio["holdings"][0]["status"], "Fresh-Buy");
        assert_eq!(body["trade"]["side"], "buy");
    }

    #[tokio::test]
    async fn test_duplicate_symbol_conflicts() {
        let server = server();
        let id = create_portfolio(&server, "Core", "10000").await;
        add_infy(&server, &id).await;

        server
            .post(&format!("/api/v1/portfolios/{}/holdings", id))
            .json(&json!({ "symbol": "INFY", "sector": "IT", "weight": "5", "buy_price": "100" }))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_weight_above_capacity_conflicts() {
        let server = server();
        let id = create_portfolio(&server, "Core", "10000").await;
        add_infy(&server, &id).await;

        server
            .post(&format!("/api/v1/portfolios/{}/holdings", id))
            .json(&json!({ "symbol": "TCS", "sector": "IT", "weight": "80", "buy_price": "100" }))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_weight_too_small_for_a_share_is_unprocessable() {
        let server = server();
        let id = create_portfolio(&server, "Small", "1000").await;

        server
            .post(&format!("/api/v1/portfolios/{}/holdings", id))
            .json(&json!({ "symbol": "MRF", "sector": "Auto", "weight": "10", "buy_price": "333" }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_partial_sell_realizes_profit() {
        let server = server();
        let id = create_portfolio(&server, "Core", "10000").await;
        add_infy(&server, &id).await;

        let response = server
            .put(&format!("/api/v1/portfolios/{}/holdings/INFY", id))
            .json(&json!({ "action": "partial_sell", "proportion": "0.4", "market_price": "120" }))
            .await;
        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(dec_field(&body["portfolio"], "cash_balance"), dec!(8700));
        assert_eq!(dec_field(&body["portfolio"], "realized_pnl"), dec!(200));
        assert_eq!(body["portfolio"]["holdings"][0]["quantity"], 15);
        assert_eq!(body["trade"]["side"], "sell");
        assert_eq!(dec_field(&body["trade"]["pnl"], "profit_loss"), dec!(200));
    }

    #[tokio::test]
    async fn test_sell_with_archive_retention() {
        let server = server_with(ApiConfig {
            sold_holding_retention: SoldHoldingRetention::Archive,
            ..Default::default()
        });
        let id = create_portfolio(&server, "Core", "10000").await;
        add_infy(&server, &id).await;

        let response = server
            .put(&format!("/api/v1/portfolios/{}/holdings/infy", id))
            .json(&json!({ "action": "sell", "market_price": "90" }))
            .await;
        response.assert_status_ok();

        let body = response.json::<Value>();
        let symbol = body["portfolio"]["holdings"][0]["symbol"].as_str().unwrap();
        assert!(symbol.starts_with("Sold-"));
        assert!(symbol.ends_with("-INFY"));
        assert_eq!(dec_field(&body["portfolio"], "realized_pnl"), dec!(-250));
        assert_eq!(dec_field(&body["portfolio"], "cash_balance"), dec!(9750));
    }

    #[tokio::test]
    async fn test_unvaluable_price_leaves_portfolio_readable() {
        let server = server();
        let id = create_portfolio(&server, "Bounded", "10000").await;
        add_infy(&server, &id).await;

        server
            .put(&format!("/api/v1/portfolios/{}/holdings/INFY", id))
            .json(&json!({ "action": "hold", "current_price": Decimal::MAX.to_string() }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let response = server.get(&format!("/api/v1/portfolios/{}", id)).await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(dec_field(&body["holdings"][0], "current_price"), dec!(100));
        assert_eq!(dec_field(&body, "base_capital"), dec!(10000));
    }

    #[tokio::test]
    async fn test_edit_unknown_symbol_is_not_found() {
        let server = server();
        let id = create_portfolio(&server, "Core", "10000").await;

        server
            .put(&format!("/api/v1/portfolios/{}/holdings/WIPRO", id))
            .json(&json!({ "action": "sell", "market_price": "400" }))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_remove_returns_cost_to_cash() {
        let server = server();
        let id = create_portfolio(&server, "Core", "10000").await;
        add_infy(&server, &id).await;

        let response = server
            .delete(&format!("/api/v1/portfolios/{}/holdings/INFY", id))
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(dec_field(&body["portfolio"], "cash_balance"), dec!(10000));
        assert!(body["trade"].is_null());
    }

    #[tokio::test]
    async fn test_prebuilt_portfolio_state() {
        let (portfolio, repo) = TestPortfolioBuilder::new()
            .with_name("Seeded")
            .with_holding("HDFCBANK", dec!(30), dec!(1500))
            .build_in_repository()
            .await;
        let state = AppState::new(
            Arc::new(repo),
            Arc::new(InMemoryTipRepository::new()),
            ApiConfig::default(),
        )
        .unwrap();
        let server = TestServer::new(create_router(state)).unwrap();

        let body = server
            .get(&format!("/api/v1/portfolios/{}", portfolio.id.as_uuid()))
            .await
            .json::<Value>();
        assert_eq!(body["holdings"][0]["quantity"], 2);
        assert_eq!(dec_field(&body, "cash_balance"), dec!(7000));
    }
}

mod calculators {
    use super::*;

    #[tokio::test]
    async fn test_allocation_leaves_residue_in_cash() {
        let response = server()
            .post("/api/v1/calculators/allocation")
            .json(&json!({ "weight_percent": "10", "buy_price": "333", "base_capital": "1000" }))
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["quantity"], 0);
        assert_eq!(dec_field(&body, "leftover_amount"), dec!(100));
    }

    #[tokio::test]
    async fn test_allocation_with_tolerance() {
        let response = server()
            .post("/api/v1/calculators/allocation")
            .json(&json!({
                "weight_percent": "100",
                "buy_price": "101",
                "base_capital": "1000",
                "rounding": { "mode": "tolerance", "percent": "10" }
            }))
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["quantity"], 10);
        assert_eq!(dec_field(&body, "overspend_amount"), dec!(10));
    }

    #[tokio::test]
    async fn test_pnl() {
        let response = server()
            .post("/api/v1/calculators/pnl")
            .json(&json!({
                "original_quantity": 100,
                "original_buy_price": "50",
                "current_market_price": "80",
                "proportion_to_sell": "0.5"
            }))
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["quantity_sold"], 50);
        assert_eq!(dec_field(&body, "profit_loss"), dec!(1500));
        assert_eq!(dec_field(&body, "profit_loss_percent"), dec!(60));
    }

    #[tokio::test]
    async fn test_out_of_range_results_are_unprocessable() {
        let server = server();

        server
            .post("/api/v1/calculators/pnl")
            .json(&json!({
                "original_quantity": u64::MAX,
                "original_buy_price": "1",
                "current_market_price": "10000000000",
                "proportion_to_sell": "1"
            }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        server
            .post("/api/v1/calculators/allocation")
            .json(&json!({
                "weight_percent": "100",
                "buy_price": "0.0000000001",
                "base_capital": "10000000000000000000000000000"
            }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_zero_price_is_unprocessable() {
        server()
            .post("/api/v1/calculators/pnl")
            .json(&json!({
                "original_quantity": 100,
                "original_buy_price": "0",
                "current_market_price": "80",
                "proportion_to_sell": "0.5"
            }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}

mod tips {
    use super::*;

    fn buy_tip(extra: Value) -> Value {
        let mut body = json!({
            "title": "Breakout",
            "stock_symbol": "infy",
            "action": "buy",
            "entry_price": "100",
            "target_price": "120",
            "stop_loss": "90"
        });
        if let (Some(target), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                target.insert(k.clone(), v.clone());
            }
        }
        body
    }

    async fn create_tip(server: &TestServer, body: Value) -> Value {
        let response = server.post("/api/v1/tips").json(&body).await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()
    }

    #[tokio::test]
    async fn test_create_tip() {
        let server = server();
        let tip = create_tip(&server, buy_tip(json!({}))).await;

        assert_eq!(tip["stock_symbol"], "INFY");
        assert_eq!(tip["status"], "active");
        assert_eq!(tip["category"], "basic");
        assert_eq!(dec_field(&tip, "upside_percent"), dec!(20));
    }

    #[tokio::test]
    async fn test_stop_loss_above_entry_is_unprocessable() {
        server()
            .post("/api/v1/tips")
            .json(&buy_tip(json!({ "stop_loss": "105" })))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unknown_portfolio_is_not_found() {
        server()
            .post("/api/v1/tips")
            .json(&buy_tip(json!({ "portfolio_id": uuid::Uuid::new_v4() })))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_close_then_close_again() {
        let server = server();
        let tip = create_tip(&server, buy_tip(json!({}))).await;
        let path = format!("/api/v1/tips/{}/close", tip["id"].as_str().unwrap());

        let closed = server.post(&path).json(&json!({ "exit_price": "115" })).await;
        closed.assert_status_ok();
        let body = closed.json::<Value>();
        assert_eq!(body["status"], "closed");
        assert_eq!(dec_field(&body, "realized_return_percent"), dec!(15));

        server
            .post(&path)
            .json(&json!({}))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_active_tip() {
        let server = server();
        let tip = create_tip(&server, buy_tip(json!({}))).await;

        let response = server
            .put(&format!("/api/v1/tips/{}", tip["id"].as_str().unwrap()))
            .json(&json!({ "target_price": "130", "category": "premium" }))
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["category"], "premium");
        assert_eq!(dec_field(&body, "upside_percent"), dec!(30));
    }

    #[tokio::test]
    async fn test_list_filters_and_portfolio_scope() {
        let server = server();
        let portfolio_id = create_portfolio(&server, "Advisory", "10000").await;

        create_tip(&server, buy_tip(json!({ "portfolio_id": portfolio_id }))).await;
        create_tip(&server, buy_tip(json!({ "category": "premium" }))).await;

        let all = server.get("/api/v1/tips").await.json::<Value>();
        assert_eq!(all.as_array().unwrap().len(), 2);

        let premium = server
            .get("/api/v1/tips")
            .add_query_param("category", "premium")
            .await
            .json::<Value>();
        assert_eq!(premium.as_array().unwrap().len(), 1);

        let scoped = server
            .get(&format!("/api/v1/portfolios/{}/tips", portfolio_id))
            .await
            .json::<Value>();
        assert_eq!(scoped.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_deleting_portfolio_detaches_tips() {
        let server = server();
        let portfolio_id = create_portfolio(&server, "Short-lived", "10000").await;
        let tip = create_tip(&server, buy_tip(json!({ "portfolio_id": portfolio_id }))).await;

        server
            .delete(&format!("/api/v1/portfolios/{}", portfolio_id))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let fetched = server
            .get(&format!("/api/v1/tips/{}", tip["id"].as_str().unwrap()))
            .await
            .json::<Value>();
        assert!(fetched["portfolio_id"].is_null());
    }

    #[tokio::test]
    async fn test_delete_tip() {
        let (tip, repo) = TestTipBuilder::new().with_symbol("LT").build_in_repository().await;
        let state = AppState::new(
            Arc::new(InMemoryPortfolioRepository::new()),
            Arc::new(repo),
            ApiConfig::default(),
        )
        .unwrap();
        let server = TestServer::new(create_router(state)).unwrap();
        let path = format!("/api/v1/tips/{}", tip.id.as_uuid());

        server.get(&path).await.assert_status_ok();
        server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
        server.get(&path).await.assert_status_not_found();
    }
}
