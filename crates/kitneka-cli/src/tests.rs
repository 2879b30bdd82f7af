use kitneka_core::{
    FilterScope, HistoryRow, MatchClassification, Offer, OfferOrigin, Product, Recommendation,
    SeasonalTip, SortOrder, Verdict,
};

use super::*;
use crate::compare::{format_offer_line, format_recommendation};
use crate::history::format_history_row;
use crate::search::{build_filter, format_product_line, SearchTarget};
use crate::tips::format_tip;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["kitneka-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_search_with_defaults() {
    let cli = Cli::try_parse_from(["kitneka-cli", "search", "sunscreen"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Search {
            ref query,
            view: SearchArgs {
                all: false,
                clean_beauty: false,
                min_price: None,
                max_price: None,
                sort: SortArg::Relevance,
                top_rated: false,
                limit: 15,
            },
        }) if query == "sunscreen"
    ));
}

#[test]
fn parses_search_with_filters() {
    let cli = Cli::try_parse_from([
        "kitneka-cli",
        "search",
        "lip balm",
        "--all",
        "--clean-beauty",
        "--min-price",
        "100",
        "--max-price",
        "500",
        "--sort",
        "price-desc",
        "--limit",
        "5",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Search {
            view: SearchArgs {
                all: true,
                clean_beauty: true,
                min_price: Some(_),
                max_price: Some(_),
                sort: SortArg::PriceDesc,
                limit: 5,
                ..
            },
            ..
        })
    ));
}

#[test]
fn parses_search_url_with_shared_flags() {
    let cli = Cli::try_parse_from([
        "kitneka-cli",
        "search-url",
        "https://www.myntra.com/dresses/123",
        "--top-rated",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::SearchUrl {
            ref url,
            view: SearchArgs { top_rated: true, .. },
        }) if url == "https://www.myntra.com/dresses/123"
    ));
}

#[test]
fn parses_similar_and_tips() {
    let cli = Cli::try_parse_from(["kitneka-cli", "similar", "p-42"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Similar { ref product_id }) if product_id == "p-42"
    ));

    let cli = Cli::try_parse_from(["kitneka-cli", "tips"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Tips)));
}

#[test]
fn search_requires_query() {
    assert!(Cli::try_parse_from(["kitneka-cli", "search"]).is_err());
}

#[test]
fn rejects_unknown_sort() {
    assert!(Cli::try_parse_from(["kitneka-cli", "search", "x", "--sort", "cheapest"]).is_err());
}

#[test]
fn parses_compare_command() {
    let cli = Cli::try_parse_from(["kitneka-cli", "compare", "p-42"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Compare { ref product_id }) if product_id == "p-42"
    ));
}

#[test]
fn parses_history_with_default_range() {
    let cli = Cli::try_parse_from(["kitneka-cli", "history", "p-42"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::History {
            days: HistoryRange::Month,
            ..
        })
    ));
}

#[test]
fn parses_history_year_range() {
    let cli = Cli::try_parse_from(["kitneka-cli", "history", "p-42", "--days", "365"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::History {
            days: HistoryRange::Year,
            ..
        })
    ));
}

#[test]
fn rejects_unsupported_history_range() {
    assert!(Cli::try_parse_from(["kitneka-cli", "history", "p-42", "--days", "14"]).is_err());
}

#[test]
fn build_filter_defaults_to_popular_relevance() {
    let filter = build_filter(false, false, None, None, SortArg::Relevance).unwrap();
    assert_eq!(filter.scope, FilterScope::Popular);
    assert_eq!(filter.sort, SortOrder::Relevance);
    assert!(filter.price_range.is_none());
    assert!(!filter.clean_beauty_only);
}

#[test]
fn build_filter_opens_missing_bound() {
    let filter = build_filter(true, false, Some(200.0), None, SortArg::PriceAsc).unwrap();
    assert_eq!(filter.scope, FilterScope::All);
    assert_eq!(filter.sort, SortOrder::PriceAsc);
    let (min, max) = filter.price_range.unwrap();
    assert!((min - 200.0).abs() < f64::EPSILON);
    assert!(max.is_infinite());
}

#[test]
fn build_filter_rejects_inverted_range() {
    assert!(build_filter(false, false, Some(500.0), Some(100.0), SortArg::Relevance).is_err());
    assert!(build_filter(false, false, Some(-1.0), None, SortArg::Relevance).is_err());
}

#[test]
fn product_line_includes_key_fields() {
    let product = Product {
        id: "p-1".to_owned(),
        title: "Aloe Gel".to_owned(),
        price: 249.0,
        original_price: Some(299.0),
        rating: Some(4.25),
        reviews: 812,
        source: "Nykaa".to_owned(),
        match_classification: Some(MatchClassification::ExactMatch),
        ..Product::default()
    };
    let line = format_product_line(&product);
    assert!(line.starts_with("Aloe Gel  ₹249 (was ₹299)"), "line: {line}");
    assert!(line.contains("@ Nykaa"));
    assert!(line.contains("(812 reviews)"));
    assert!(line.contains("[EXACT_MATCH]"));
    assert!(line.ends_with("id=p-1"));
}

#[test]
fn offer_line_shows_shipping_and_primary_marker() {
    let offer = Offer {
        seller: "Brand Store".to_owned(),
        price: 400.0,
        shipping: 49.0,
        eta: "Check site".to_owned(),
        url: "https://brand.example/p".to_owned(),
        image: String::new(),
        match_classification: None,
        match_score: None,
        origin: OfferOrigin::Primary,
        is_best: true,
    };
    let line = format_offer_line(&offer);
    assert_eq!(
        line,
        "Brand Store  ₹400 + ₹49 shipping  (Check site)  *this listing*  https://brand.example/p"
    );
}

#[test]
fn recommendation_line_has_verdict_and_score() {
    let rec = Recommendation {
        verdict: Verdict::GreatBuy,
        title: "Great Buy".to_owned(),
        reason: "Best price is 19% below the market average of ₹123.".to_owned(),
        score: 9,
    };
    assert_eq!(
        format_recommendation(&rec),
        "GREAT BUY (9/10): Great Buy. Best price is 19% below the market average of ₹123."
    );
}

#[test]
fn history_row_falls_back_to_raw_date() {
    let row = HistoryRow {
        date: None,
        raw_date: "sometime".to_owned(),
        store: "Amazon".to_owned(),
        price: 99.0,
        url: String::new(),
    };
    assert_eq!(format_history_row(&row), "sometime  Amazon  ₹99");

    let dated = HistoryRow {
        date: kitneka_core::history::parse_history_date("2024-03-01"),
        ..row
    };
    assert_eq!(format_history_row(&dated), "Fri, 01 Mar 2024  Amazon  ₹99");
}

#[test]
fn search_target_labels() {
    assert_eq!(SearchTarget::Query("lip balm").to_string(), "\"lip balm\"");
    let by_url = SearchTarget::ProductUrl {
        url: "https://shop.example/p/1",
        location: "Mumbai",
    };
    assert_eq!(by_url.to_string(), "https://shop.example/p/1");
}

#[test]
fn tip_line_joins_title_and_description() {
    let tip = SeasonalTip {
        title: "Wait for the Diwali sales".to_owned(),
        description: "Electronics usually drop 20-40%.".to_owned(),
    };
    assert_eq!(
        format_tip(&tip),
        "Wait for the Diwali sales: Electronics usually drop 20-40%."
    );
    let bare = SeasonalTip {
        title: "Winter wear discounts".to_owned(),
        description: "  ".to_owned(),
    };
    assert_eq!(format_tip(&bare), "Winter wear discounts");
}
