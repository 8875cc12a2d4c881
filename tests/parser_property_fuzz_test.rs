use landing_motion::Page;
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{TestCaseError, TestCaseResult};

#[derive(Debug, Clone)]
enum Markup {
    Text(String),
    Element {
        tag: &'static str,
        class: Option<&'static str>,
        children: Vec<Markup>,
    },
}

impl Markup {
    fn render(&self, out: &mut String) {
        match self {
            Markup::Text(text) => out.push_str(text),
            Markup::Element {
                tag,
                class,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                if let Some(class) = class {
                    out.push_str(&format!(r#" class="{class}""#));
                }
                out.push('>');
                for child in children {
                    child.render(out);
                }
                out.push_str(&format!("</{tag}>"));
            }
        }
    }

    fn count_class(&self, wanted: &str) -> usize {
        match self {
            Markup::Text(_) => 0,
            Markup::Element {
                class, children, ..
            } => {
                usize::from(*class == Some(wanted))
                    + children
                        .iter()
                        .map(|child| child.count_class(wanted))
                        .sum::<usize>()
            }
        }
    }

    fn count_class_inside(&self, ancestor: &str, wanted: &str, inside: bool) -> usize {
        match self {
            Markup::Text(_) => 0,
            Markup::Element {
                class, children, ..
            } => {
                let own = usize::from(inside && *class == Some(wanted));
                let inside = inside || *class == Some(ancestor);
                own + children
                    .iter()
                    .map(|child| child.count_class_inside(ancestor, wanted, inside))
                    .sum::<usize>()
            }
        }
    }
}

fn text_strategy() -> BoxedStrategy<Markup> {
    prop_oneof![
        Just("Macaw"),
        Just("1,234+ hectares"),
        Just(" & "),
        Just("&amp;"),
        Just("&#8212;"),
        Just("日本語"),
        Just("  "),
    ]
    .prop_map(|text| Markup::Text(text.to_string()))
    .boxed()
}

fn markup_strategy() -> BoxedStrategy<Markup> {
    text_strategy().prop_recursive(5, 64, 6, |inner| {
        (
            prop_oneof![Just("div"), Just("section"), Just("p"), Just("span"), Just("li")],
            prop_oneof![
                Just(None),
                Just(Some("btm-glass-card")),
                Just(Some("btm-stat-card")),
                Just(Some("btm-stats-grid")),
            ],
            vec(inner, 0..6),
        )
            .prop_map(|(tag, class, children)| Markup::Element {
                tag,
                class,
                children,
            })
    })
    .boxed()
}

fn fail(err: landing_motion::Error) -> TestCaseError {
    TestCaseError::fail(format!("{err:?}"))
}

fn assert_markup_never_panics(source: &str) -> TestCaseResult {
    let outcome = std::panic::catch_unwind(|| Page::from_html(source).map(|_| ()));
    prop_assert!(outcome.is_ok(), "parser panicked for source: {source:?}");
    Ok(())
}

fn assert_selectors_match_generated_tree(tree: &Markup) -> TestCaseResult {
    let mut html = String::new();
    tree.render(&mut html);
    let page = Page::from_html(&html).map_err(fail)?;

    for class in ["btm-glass-card", "btm-stat-card", "btm-stats-grid"] {
        let found = page.select_all(&format!(".{class}")).map_err(fail)?;
        prop_assert_eq!(found.len(), tree.count_class(class), "class {}", class);
    }
    let nested = page
        .select_all(".btm-stats-grid .btm-stat-card")
        .map_err(fail)?;
    prop_assert_eq!(
        nested.len(),
        tree.count_class_inside("btm-stats-grid", "btm-stat-card", false)
    );

    let grouped = page
        .select_all(".btm-glass-card, .btm-stat-card")
        .map_err(fail)?;
    prop_assert_eq!(
        grouped.len(),
        tree.count_class("btm-glass-card") + tree.count_class("btm-stat-card")
    );
    prop_assert!(grouped.windows(2).all(|pair| pair[0] < pair[1]));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn parser_generated_markup_fragments_do_not_panic(
        pieces in vec(
            prop_oneof![
                Just("<div"),
                Just(">"),
                Just("</div>"),
                Just("<!--"),
                Just("-->"),
                Just("<script>"),
                Just("</script>"),
                Just(r#" class="btm-stat-card""#),
                Just("='"),
                Just("&#x1F99C;"),
                Just("&#99999999;"),
                Just("text"),
                Just("<br/>"),
            ],
            0..24,
        )
    ) {
        assert_markup_never_panics(&pieces.concat())?;
    }

    #[test]
    fn selectors_count_generated_elements(tree in markup_strategy()) {
        assert_selectors_match_generated_tree(&tree)?;
    }
}
