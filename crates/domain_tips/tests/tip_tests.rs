//! Tests for domain_tips

use rust_decimal_macros::dec;

use core_kernel::PortfolioId;
use domain_tips::{Tip, TipAction, TipCategory, TipError, TipQuery, TipStatus};

mod validation_tests {
    use super::*;

    fn field_of(result: Result<(), TipError>) -> String {
        match result {
            Err(TipError::Validation { field, .. }) => field,
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_title_required() {
        let tip = Tip::new("  ", "HDFCBANK", TipAction::Hold, dec!(1500), dec!(1500));
        assert_eq!(field_of(tip.validate()), "title");
    }

    #[test]
    fn test_symbol_required() {
        let tip = Tip::new("Hold", "", TipAction::Hold, dec!(1500), dec!(1500));
        assert_eq!(field_of(tip.validate()), "stock_symbol");
    }

    #[test]
    fn test_prices_must_be_positive() {
        let tip = Tip::new("Hold", "SBIN", TipAction::Hold, dec!(0), dec!(600));
        assert_eq!(field_of(tip.validate()), "entry_price");
    }

    #[test]
    fn test_buy_stop_loss_below_entry() {
        let tip = Tip::new("Buy", "SBIN", TipAction::Buy, dec!(600), dec!(700)).with_stop_loss(dec!(610));
        assert_eq!(field_of(tip.validate()), "stop_loss");
    }

    #[test]
    fn test_sell_levels_are_mirrored() {
        let ok = Tip::new("Book profits", "SBIN", TipAction::Sell, dec!(600), dec!(540)).with_stop_loss(dec!(630));
        assert!(ok.validate().is_ok());

        let bad = Tip::new("Book profits", "SBIN", TipAction::Sell, dec!(600), dec!(650));
        assert_eq!(field_of(bad.validate()), "target_price");
    }

    #[test]
    fn test_hold_has_no_ordering_rule() {
        let tip = Tip::new("Stay invested", "LT", TipAction::Hold, dec!(3500), dec!(3400));
        assert!(tip.validate().is_ok());
    }
}

mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_close_records_exit() {
        let mut tip = Tip::new("Momentum", "TATAMOTORS", TipAction::Buy, dec!(800), dec!(950));
        tip.close(Some(dec!(920))).unwrap();

        assert_eq!(tip.status, TipStatus::Closed);
        assert!(tip.closed_at.is_some());
        assert_eq!(tip.realized_return_percent(), Some(dec!(15)));
    }

    #[test]
    fn test_close_rejects_bad_exit_price() {
        let mut tip = Tip::new("Momentum", "TATAMOTORS", TipAction::Buy, dec!(800), dec!(950));
        assert!(tip.close(Some(dec!(-1))).is_err());
        assert!(tip.is_active());
    }

    #[test]
    fn test_open_tip_has_no_realized_return() {
        let tip = Tip::new("Momentum", "TATAMOTORS", TipAction::Buy, dec!(800), dec!(950));
        assert_eq!(tip.realized_return_percent(), None);
    }
}

mod query_tests {
    use super::*;

    #[test]
    fn test_query_filters() {
        let portfolio = PortfolioId::new();
        let tip = Tip::new("Premium pick", "ASIANPAINT", TipAction::Buy, dec!(3000), dec!(3400))
            .with_category(TipCategory::Premium)
            .with_portfolio(portfolio);

        assert!(TipQuery::default().matches(&tip));
        assert!(TipQuery::by_portfolio(portfolio).matches(&tip));
        assert!(!TipQuery::by_portfolio(PortfolioId::new()).matches(&tip));

        let closed_only = TipQuery {
            status: Some(TipStatus::Closed),
            ..Default::default()
        };
        assert!(!closed_only.matches(&tip));

        let premium = TipQuery {
            category: Some(TipCategory::Premium),
            ..Default::default()
        };
        assert!(premium.matches(&tip));
    }

    #[test]
    fn test_serde_tags() {
        let json = serde_json::to_value(TipAction::PartialProfit).unwrap();
        assert_eq!(json, "partial_profit");
    }
}
