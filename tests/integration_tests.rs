//! Integration tests using golden fixtures
//!
//! Each scenario is built in code; its TikZ output is compared against
//! testdata/tikz/<name>.tex and its markup against testdata/html/<name>.html.
//! Run all tests with: cargo test

use annexdraw::*;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Get the path to a fixture directory
fn get_fixture_dir(kind: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata").join(kind)
}

/// Normalize output for comparison (trim trailing whitespace from each line)
fn normalize_output(s: &str) -> String {
    s.lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

fn login_flow() -> Vec<Step> {
    let browser = Arc::new(Party::new("Browser", 1, 2));
    let rp = Arc::new(Party::new("RP", 2, 3));
    let idp = Arc::new(Party::new("IdP", 3, 4));
    let mut ctx = StepContext::new();

    let reply = HttpReply {
        code: "302".to_string(),
        headers: "Location: idp".to_string(),
        parameters: String::new(),
    };
    vec![
        Lifecycle::new(LifecycleArgs::new(0, LifecycleKind::Start, &browser), &mut ctx).into(),
        Request::new(
            RequestArgs::new(1, RequestKind::Http(HttpMessage::new("GET", "/login")))
                .between(&browser, &rp)
                .named("login"),
            &mut ctx,
        )
        .unwrap()
        .into(),
        Request::new(
            RequestArgs::new(2, RequestKind::HttpResponse(reply)).reply_to("login"),
            &mut ctx,
        )
        .unwrap()
        .into(),
        Action::new(ActionArgs::new(3, &idp, "authenticate"), &mut ctx).into(),
        Request::new(
            RequestArgs::new(
                4,
                RequestKind::Exchange(Exchange::HttpRequestResponse, HttpMessage::new("POST", "/token")),
            )
            .between(&browser, &idp),
            &mut ctx,
        )
        .unwrap()
        .into(),
        Lifecycle::new(
            LifecycleArgs::new(5, LifecycleKind::End, &browser).segment(2, 9, "annex_lifeline"),
            &mut ctx,
        )
        .into(),
    ]
}

fn popup_flow() -> Vec<Step> {
    let rp = Arc::new(Party::new("RP", 1, 2));
    let popup = Arc::new(Party::new("Popup", 2, 3));
    let ws = Arc::new(Party::new("Push", 3, 4));
    let mut ctx = StepContext::new();

    vec![
        DummyParty::new(0, Some(&popup), &mut ctx).into(),
        WindowLifecycle::new(
            WindowArgs::new(1, WindowKind::Open, &rp, &popup).segment(3, 8, "annex_lifeline"),
            &mut ctx,
        )
        .into(),
        ScriptAction::new(ScriptActionArgs::new(2, &popup, &rp, "login").data("code"), &mut ctx).into(),
        Request::new(
            RequestArgs::new(
                3,
                RequestKind::PostMessage {
                    body: "token".to_string(),
                    comment: "origin check".to_string(),
                },
            )
            .between(&popup, &rp),
            &mut ctx,
        )
        .unwrap()
        .into(),
        Request::new(
            RequestArgs::new(
                4,
                RequestKind::Websocket {
                    parameters: "subscribe".to_string(),
                },
            )
            .between(&rp, &ws),
            &mut ctx,
        )
        .unwrap()
        .into(),
        WindowLifecycle::new(WindowArgs::new(5, WindowKind::Close, &rp, &popup), &mut ctx).into(),
    ]
}

fn scenario(name: &str) -> Vec<Step> {
    match name {
        "login_flow" => login_flow(),
        "popup_flow" => popup_flow(),
        _ => panic!("unknown scenario: {}", name),
    }
}

/// Compare rendered output with a fixture, printing a line diff on mismatch
fn assert_matches_fixture(kind: &str, file: &str, actual: &str) {
    let path = get_fixture_dir(kind).join(file);
    let expected = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {:?}: {}", path, e));

    let expected_normalized = normalize_output(&expected);
    let actual_normalized = normalize_output(actual);

    if expected_normalized != actual_normalized {
        eprintln!("=== Fixture: {:?} ===", path);
        let expected_lines: Vec<_> = expected_normalized.lines().collect();
        let actual_lines: Vec<_> = actual_normalized.lines().collect();
        let max_lines = expected_lines.len().max(actual_lines.len());

        for i in 0..max_lines {
            let exp = expected_lines.get(i).unwrap_or(&"<missing>");
            let act = actual_lines.get(i).unwrap_or(&"<missing>");
            if exp != act {
                eprintln!("Line {}: expected {:?}", i + 1, exp);
                eprintln!("Line {}: actual   {:?}", i + 1, act);
            }
        }

        panic!("Output mismatch for fixture: {:?}", path);
    }
}

fn run_tikz_test(name: &str) {
    let steps = scenario(name);
    let actual = render_tikz(&steps, &GridResolver::default());
    assert_matches_fixture("tikz", &format!("{}.tex", name), &actual);
}

fn run_html_test(name: &str) {
    let steps = scenario(name);
    let actual = render_html(&steps);
    assert_matches_fixture("html", &format!("{}.html", name), &actual);

    // Every block must be well-formed markup carrying a grid style.
    let wrapped = format!("<root>{}</root>", actual);
    let doc = roxmltree::Document::parse(&wrapped)
        .unwrap_or_else(|e| panic!("Markup for {} is not well formed: {}", name, e));
    let blocks: Vec<_> = doc.root_element().children().filter(|n| n.is_element()).collect();
    assert!(!blocks.is_empty());
    for block in blocks {
        assert_eq!(block.tag_name().name(), "div");
        let style = block.attribute("style").unwrap_or_default();
        assert!(style.starts_with("grid-column"), "unexpected style {:?}", style);
    }
}

/// Macro to generate TikZ fixture tests
macro_rules! tikz_test {
    ($name:ident) => {
        paste::paste! {
            #[test]
            fn [<tikz_ $name>]() {
                run_tikz_test(stringify!($name));
            }
        }
    };
}

/// Macro to generate markup fixture tests
macro_rules! html_test {
    ($name:ident) => {
        paste::paste! {
            #[test]
            fn [<html_ $name>]() {
                run_html_test(stringify!($name));
            }
        }
    };
}

// =============================================================================
// TikZ fixtures
// =============================================================================

tikz_test!(login_flow);
tikz_test!(popup_flow);

// =============================================================================
// Markup fixtures
// =============================================================================

html_test!(login_flow);
html_test!(popup_flow);

#[test]
fn test_rendering_is_repeatable() {
    let steps = login_flow();
    let resolver = GridResolver::default();
    assert_eq!(render_tikz(&steps, &resolver), render_tikz(&steps, &resolver));
    assert_eq!(render_html(&steps), render_html(&steps));
}

#[test]
fn test_affected_parties_for_layout() {
    let names: Vec<Vec<String>> = popup_flow()
        .iter()
        .map(|s| s.affected_parties().iter().map(|p| p.name.clone()).collect())
        .collect();
    assert_eq!(names[0], vec!["Popup"]);
    assert_eq!(names[1], vec!["RP", "Popup"]);
    assert_eq!(names[2], vec!["Popup", "Popup", "RP"]);
    assert_eq!(names[4], vec!["RP", "Push"]);
}
