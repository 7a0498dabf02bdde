// Presentation tree - cards, rows and graphs assembled once at startup
//
// The tree renders to Bootstrap-flavoured HTML and serializes to JSON for
// /api/layout. Graph nodes carry their full Figure; the page module turns
// them into Plotly calls.

use crate::charts;
use crate::data::{client_logo, Dataset, MONTHLY_GROWTH_RATE_PCT};
use crate::figure::Figure;
use crate::format::{self, html_escape};
use crate::stats::Summary;
use serde::Serialize;

pub const DASHBOARD_TITLE: &str = "2024 Mobile Wallet Transfer Analysis";
pub const BRAND_LOGO: &str = "assets/vngrd.PNG";

pub type Style = Vec<(String, String)>;

#[derive(Debug, Clone, Serialize)]
pub struct Element {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub style: Style,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Element(Element),
    Text {
        text: String,
    },
    Image {
        src: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        class: Option<String>,
        style: Style,
    },
    Graph {
        id: String,
        figure: Figure,
    },
    Break,
}

fn style(pairs: &[(&str, &str)]) -> Style {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Node {
    pub fn el(tag: &str, class: Option<&str>, children: Vec<Node>) -> Self {
        Node::Element(Element {
            tag: tag.to_string(),
            class: class.map(str::to_string),
            style: Vec::new(),
            children,
        })
    }

    pub fn styled(tag: &str, class: Option<&str>, style: Style, children: Vec<Node>) -> Self {
        Node::Element(Element {
            tag: tag.to_string(),
            class: class.map(str::to_string),
            style,
            children,
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn graph(id: &str, figure: Figure) -> Self {
        Node::Graph {
            id: id.to_string(),
            figure,
        }
    }

    /// Append this node's HTML to `out`
    pub fn render(&self, out: &mut String) {
        match self {
            Node::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                push_attrs(out, el.class.as_deref(), &el.style);
                out.push('>');
                for child in &el.children {
                    child.render(out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
            Node::Text { text } => out.push_str(&html_escape(text)),
            Node::Image { src, class, style } => {
                out.push_str("<img src=\"");
                out.push_str(&html_escape(src));
                out.push('"');
                push_attrs(out, class.as_deref(), style);
                out.push('>');
            }
            Node::Graph { id, figure } => {
                out.push_str("<div id=\"");
                out.push_str(&html_escape(id));
                out.push_str("\" class=\"dash-graph\"");
                if let Some(height) = figure.height() {
                    out.push_str(&format!(" style=\"height: {}px\"", height));
                }
                out.push_str("></div>");
            }
            Node::Break => out.push_str("<br>"),
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.render(&mut out);
        out
    }

    /// Graphs in document order
    pub fn graphs(&self) -> Vec<(&str, &Figure)> {
        let mut found = Vec::new();
        self.collect_graphs(&mut found);
        found
    }

    fn collect_graphs<'a>(&'a self, found: &mut Vec<(&'a str, &'a Figure)>) {
        match self {
            Node::Element(el) => {
                for child in &el.children {
                    child.collect_graphs(found);
                }
            }
            Node::Graph { id, figure } => found.push((id.as_str(), figure)),
            _ => {}
        }
    }
}

fn push_attrs(out: &mut String, class: Option<&str>, style: &Style) {
    if let Some(class) = class {
        out.push_str(" class=\"");
        out.push_str(&html_escape(class));
        out.push('"');
    }
    if !style.is_empty() {
        let css: Vec<String> = style.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        out.push_str(" style=\"");
        out.push_str(&html_escape(&css.join("; ")));
        out.push('"');
    }
}

// ============================================================================
// BUILDING BLOCKS
// ============================================================================

fn row(children: Vec<Node>) -> Node {
    Node::el("div", Some("row mb-4"), children)
}

/// Grid column; `None` shares the row equally
fn col(width: Option<u8>, children: Vec<Node>) -> Node {
    let class = match width {
        Some(w) => format!("col-{}", w),
        None => "col".to_string(),
    };
    Node::el("div", Some(class.as_str()), children)
}

fn card(header: Option<&str>, body: Vec<Node>) -> Node {
    let mut children = Vec::new();
    if let Some(h) = header {
        children.push(Node::el("div", Some("card-header"), vec![Node::text(h)]));
    }
    children.push(Node::el("div", Some("card-body"), body));
    Node::el("div", Some("card shadow-sm"), children)
}

fn chart_card(width: u8, header: &str, id: &str, figure: Figure, extra: Vec<Node>) -> Node {
    let mut body = vec![Node::graph(id, figure)];
    body.extend(extra);
    col(Some(width), vec![card(Some(header), body)])
}

fn span(class: &str, text: impl Into<String>) -> Node {
    Node::el("span", Some(class), vec![Node::text(text)])
}

/// Paragraph under a chart: lead text then a muted detail
fn footnote(class: &str, parts: Vec<Node>) -> Node {
    Node::el("div", None, vec![Node::el("p", Some(class), parts)])
}

/// Headline number card: title, big value, labelled secondary value
fn metric_card(title: &str, value: Vec<Node>, caption: &str, detail: String, detail_class: &str) -> Node {
    col(
        None,
        vec![card(
            None,
            vec![
                Node::el("h5", Some("card-title text-center"), vec![Node::text(title)]),
                Node::el("h2", Some("text-primary text-center"), value),
                Node::el(
                    "p",
                    Some("text-center"),
                    vec![
                        span("regular-text", caption),
                        span(&format!("regular-text {}", detail_class), detail),
                    ],
                ),
            ],
        )],
    )
}

// ============================================================================
// DASHBOARD
// ============================================================================

pub fn build_dashboard(data: &Dataset, summary: &Summary) -> Node {
    Node::el(
        "div",
        Some("container-fluid p-4"),
        vec![
            header(),
            metric_row(summary),
            row(vec![chart_card(
                12,
                "Monthly Transaction Analysis",
                "monthly-trends",
                charts::monthly_trends(data),
                vec![],
            )]),
            row(vec![
                chart_card(
                    4,
                    "Success Rate Performance",
                    "success-gauge",
                    charts::success_gauge(summary),
                    vec![],
                ),
                chart_card(
                    8,
                    "User Activity Metrics",
                    "user-activity",
                    charts::user_activity(summary),
                    vec![],
                ),
            ]),
            row(vec![
                chart_card(
                    6,
                    "Monthly User Activity",
                    "monthly-users",
                    charts::monthly_users(data),
                    vec![],
                ),
                chart_card(
                    6,
                    "Geographic Distribution",
                    "geographic",
                    charts::geographic(data),
                    vec![],
                ),
            ]),
            row(vec![
                chart_card(
                    6,
                    "Daily Transaction Pattern",
                    "daily-pattern",
                    charts::daily_pattern(data),
                    vec![footnote(
                        "mb-0 mt-3 regular-text",
                        vec![
                            Node::text(format!("Peak Day: {} ", summary.peak_day.day)),
                            span(
                                "text-muted",
                                format!(
                                    "(KES {}, {} transactions)",
                                    format::millions(summary.peak_day_volume, 1),
                                    format::count(summary.peak_day_count)
                                ),
                            ),
                        ],
                    )],
                ),
                chart_card(
                    6,
                    "Failure Analysis",
                    "failure-treemap",
                    charts::failure_treemap(data),
                    vec![footnote(
                        "mb-0 mt-3 regular-text text-center",
                        vec![
                            Node::text("Total Failed Transactions: "),
                            span("text-muted", format::count(summary.total_failures)),
                        ],
                    )],
                ),
            ]),
            row(vec![chart_card(
                12,
                "Hourly Transaction Pattern",
                "hourly-pattern",
                charts::hourly_pattern(data),
                vec![footnote(
                    "mb-0 mt-3 regular-text",
                    vec![
                        Node::text(format!("Peak Volume: {} ", summary.peak_volume_hour.label)),
                        span(
                            "text-muted",
                            format!("(KES {})", format::millions(summary.peak_volume_hour.volume, 1)),
                        ),
                        Node::Break,
                        Node::text(format!("Peak Transactions: {} ", summary.peak_count_hour.label)),
                        span(
                            "text-muted",
                            format!("({} transactions)", format::count(summary.peak_count_hour.count)),
                        ),
                    ],
                )],
            )]),
            row(vec![
                chart_card(
                    6,
                    "Client Market Share",
                    "client-share",
                    charts::client_share(data),
                    vec![
                        logo_strip(data),
                        footnote(
                            "mb-0 mt-3 regular-text text-center",
                            vec![
                                Node::text(format!("Top Client: {} ", summary.top_client.client)),
                                span(
                                    "text-muted",
                                    format!(
                                        "({} market share)",
                                        format::percent(summary.top_client.market_share, 1)
                                    ),
                                ),
                            ],
                        ),
                    ],
                ),
                chart_card(
                    6,
                    "Client Performance Metrics",
                    "client-performance",
                    charts::client_performance(data),
                    vec![],
                ),
            ]),
        ],
    )
}

fn header() -> Node {
    Node::el(
        "div",
        Some("row"),
        vec![col(
            None,
            vec![
                Node::styled(
                    "div",
                    None,
                    style(&[
                        ("display", "flex"),
                        ("justify-content", "center"),
                        ("align-items", "center"),
                        ("padding", "40px"),
                        ("margin-bottom", "30px"),
                        ("width", "100%"),
                    ]),
                    vec![Node::Image {
                        src: BRAND_LOGO.to_string(),
                        class: Some("logo".to_string()),
                        style: style(&[("height", "150px"), ("object-fit", "contain")]),
                    }],
                ),
                Node::styled(
                    "h1",
                    Some("text-primary text-center mb-4"),
                    style(&[("letter-spacing", "2px")]),
                    vec![Node::text(DASHBOARD_TITLE)],
                ),
            ],
        )],
    )
}

fn metric_row(summary: &Summary) -> Node {
    row(vec![
        metric_card(
            "Total Annual Transactions",
            vec![Node::text(format::count(summary.total_transactions))],
            "Monthly Average: ",
            format::thousands(summary.mean_monthly_transactions, 0),
            "text-success",
        ),
        metric_card(
            "Average Success Rate",
            vec![
                Node::text(format::fixed(summary.mean_success_rate, 1)),
                Node::el("small", Some("text-muted"), vec![Node::text("%")]),
            ],
            "Peak: ",
            format::percent(summary.peak_success_rate, 1),
            "text-success",
        ),
        metric_card(
            "Total Volume (KES)",
            vec![Node::text(format::billions(summary.total_volume))],
            "Monthly Average: ",
            format!("KES {}", format::billions(summary.mean_monthly_volume)),
            "text-success",
        ),
        metric_card(
            "Total Unique Users",
            vec![Node::text(format::compact_millions(summary.total_unique_users as f64))],
            "Monthly Growth Rate",
            format::percent(MONTHLY_GROWTH_RATE_PCT, 2),
            format::change_class(MONTHLY_GROWTH_RATE_PCT),
        ),
    ])
}

/// Logos of clients that have one, in table order
fn logo_strip(data: &Dataset) -> Node {
    let mut seen: Vec<&str> = Vec::new();
    let mut logos = Vec::new();

    for record in &data.clients {
        if seen.contains(&record.client.as_str()) {
            continue;
        }
        seen.push(&record.client);

        if let Some(path) = client_logo(&record.client) {
            logos.push(Node::el(
                "div",
                None,
                vec![Node::Image {
                    src: format!("assets/{}", path),
                    class: None,
                    style: style(&[
                        ("width", "60px"),
                        ("height", "30px"),
                        ("object-fit", "contain"),
                        ("margin", "5px"),
                        ("padding", "5px"),
                        ("background-color", "#ffffff"),
                        ("border-radius", "4px"),
                        ("box-shadow", "0 1px 3px rgba(0,0,0,0.1)"),
                    ]),
                }],
            ));
        }
    }

    Node::styled(
        "div",
        None,
        style(&[
            ("display", "flex"),
            ("flex-wrap", "wrap"),
            ("justify-content", "center"),
            ("align-items", "center"),
            ("margin-top", "20px"),
            ("gap", "10px"),
        ]),
        logos,
    )
}
