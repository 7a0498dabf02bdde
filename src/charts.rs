// Figure builders - one per dashboard chart
//
// Each builder is a pure mapping from the tables (and, where a chart shows an
// aggregate, the Summary) to a Figure with fixed styling.

use crate::data::{Dataset, ACTIVE_COUNTRIES};
use crate::figure::*;
use crate::format;
use crate::stats::Summary;

const STANDARD_MARGIN: Margin = Margin { l: 50, r: 50, t: 50, b: 30 };

/// Client pie palette, in table order
const CLIENT_PALETTE: [&str; 8] = [
    "rgb(82, 109, 255)",
    "rgb(255, 99, 71)",
    "rgb(32, 178, 170)",
    "rgb(255, 159, 64)",
    "rgb(153, 102, 255)",
    "rgb(255, 99, 132)",
    "rgb(75, 192, 192)",
    "rgb(54, 162, 235)",
];

fn labels<'a, I: IntoIterator<Item = &'a String>>(items: I) -> Values {
    Values::Labels(items.into_iter().cloned().collect())
}

fn line_series(name: &str, x: Values, y: Vec<f64>, color: &str, size: u32, yaxis: &str) -> Trace {
    Trace::Scatter(Scatter {
        name: Some(name.to_string()),
        x,
        y,
        mode: "lines+markers".to_string(),
        marker: Some(Marker::dot(color, size)),
        line: Some(Line::new(color, 2)),
        yaxis: Some(yaxis.to_string()),
        ..Default::default()
    })
}

fn bar_series(name: &str, x: Values, y: Vec<f64>, color: &str, yaxis: Option<&str>) -> Trace {
    Trace::Bar(Bar {
        name: name.to_string(),
        x,
        y,
        marker: Some(Marker::solid(color)),
        yaxis: yaxis.map(str::to_string),
    })
}

/// Bars on the left axis, a line on the right axis
fn dual_axis_layout(title: &str, left: &str, right: Axis, height: u32, margin: Margin) -> Layout {
    Layout {
        title: Some(Title::Text(title.to_string())),
        yaxis: Some(Axis::tinted(left, BLUE)),
        yaxis2: Some(right),
        height: Some(height),
        margin: Some(margin),
        legend: Some(Legend::top_center()),
        ..Default::default()
    }
}

// ============================================================================
// MONTHLY
// ============================================================================

pub fn monthly_trends(data: &Dataset) -> Figure {
    let months = labels(data.monthly.iter().map(|m| &m.month));

    let success_axis = Axis {
        range: Some([90.0, 100.0]),
        ..Axis::secondary("Success Rate (%)", ORANGE)
    };

    Figure::new(
        vec![
            bar_series(
                "Volume",
                months.clone(),
                data.monthly.iter().map(|m| m.volume / 1e6).collect(),
                BLUE,
                Some("y"),
            ),
            line_series(
                "Success Rate",
                months,
                data.monthly.iter().map(|m| m.success_rate).collect(),
                ORANGE,
                8,
                "y2",
            ),
        ],
        dual_axis_layout(
            "Monthly Volume and Success Rate Trends",
            "Volume (KES Millions)",
            success_axis,
            400,
            STANDARD_MARGIN,
        ),
    )
}

pub fn success_gauge(summary: &Summary) -> Figure {
    let shade = |alpha: f64| format!("rgba(0, 100, 0, {})", alpha);

    let indicator = Indicator {
        mode: "gauge+number".to_string(),
        value: summary.mean_success_rate,
        title: IndicatorTitle {
            text: "Average Success Rate".to_string(),
            font: Font::sized(16),
            align: "center".to_string(),
        },
        number: IndicatorNumber {
            suffix: "%".to_string(),
            font: Font::sized(28),
        },
        gauge: Gauge {
            axis: GaugeAxis { range: [0.0, 100.0] },
            bar: GaugeBar {
                color: "#006400".to_string(),
            },
            steps: vec![
                GaugeStep { range: [0.0, 75.0], color: shade(0.2) },
                GaugeStep { range: [75.0, 85.0], color: shade(0.4) },
                GaugeStep { range: [85.0, 100.0], color: shade(0.6) },
            ],
            threshold: GaugeThreshold {
                line: Line::new("red", 2),
                thickness: 0.75,
                value: summary.mean_success_rate,
            },
        },
    };

    Figure::new(
        vec![Trace::Indicator(indicator)],
        Layout {
            height: Some(300),
            margin: Some(Margin::new(30, 30, 30, 30)),
            ..Default::default()
        },
    )
}

/// Three headline numbers drawn as text on a blank plot
pub fn user_activity(summary: &Summary) -> Figure {
    let columns = vec![0.2, 0.5, 0.8];

    let text_row = |y: f64, text: Vec<String>, font: Font| {
        Trace::Scatter(Scatter {
            x: Values::Numbers(columns.clone()),
            y: vec![y; 3],
            mode: "text".to_string(),
            text: Some(text),
            textfont: Some(font),
            hoverinfo: Some("none".to_string()),
            showlegend: Some(false),
            ..Default::default()
        })
    };

    let icons = vec!["🌍".to_string(), "👥".to_string(), "👤".to_string()];
    let captions = vec![
        "Active Countries".to_string(),
        "Total Remitters".to_string(),
        "Total Recipients".to_string(),
    ];
    let values = vec![
        ACTIVE_COUNTRIES.to_string(),
        format::count(summary.total_remitters),
        format::count(summary.total_recipients),
    ];

    Figure::new(
        vec![
            text_row(1.15, icons, Font::sized(24)),
            text_row(1.0, captions, Font::sized(14)),
            text_row(
                0.85,
                values,
                Font {
                    size: Some(24),
                    color: Some("#2E86C1".to_string()),
                },
            ),
        ],
        Layout {
            height: Some(300),
            showlegend: Some(false),
            xaxis: Some(Axis::hidden([0.0, 1.0])),
            yaxis: Some(Axis::hidden([0.5, 1.2])),
            margin: Some(Margin::new(20, 20, 20, 20)),
            paper_bgcolor: Some("white".to_string()),
            plot_bgcolor: Some("white".to_string()),
            ..Default::default()
        },
    )
}

pub fn monthly_users(data: &Dataset) -> Figure {
    let months = labels(data.monthly.iter().map(|m| &m.month));

    Figure::new(
        vec![
            bar_series(
                "Remitters",
                months.clone(),
                data.monthly.iter().map(|m| m.unique_remitters as f64).collect(),
                BLUE,
                None,
            ),
            bar_series(
                "Recipients",
                months,
                data.monthly.iter().map(|m| m.unique_recipients as f64).collect(),
                ORANGE,
                None,
            ),
        ],
        Layout {
            title: Some(Title::Text("Monthly Active Users".to_string())),
            barmode: Some("group".to_string()),
            height: Some(400),
            margin: Some(STANDARD_MARGIN),
            legend: Some(Legend::top_center()),
            ..Default::default()
        },
    )
}

// ============================================================================
// GEOGRAPHY / DAILY / FAILURES / HOURLY
// ============================================================================

pub fn geographic(data: &Dataset) -> Figure {
    let pie = Pie {
        labels: data.countries.iter().map(|c| c.country.clone()).collect(),
        values: data.countries.iter().map(|c| c.volume).collect(),
        textinfo: "label+percent".to_string(),
        hole: 0.3,
        ..Default::default()
    };

    Figure::new(
        vec![Trace::Pie(pie)],
        Layout {
            title: Some(Title::Text("Transaction Volume by Country".to_string())),
            height: Some(400),
            margin: Some(STANDARD_MARGIN),
            ..Default::default()
        },
    )
}

pub fn daily_pattern(data: &Dataset) -> Figure {
    let days = labels(data.daily.iter().map(|d| &d.day));

    Figure::new(
        vec![
            bar_series(
                "Volume",
                days.clone(),
                data.daily.iter().map(|d| d.volume / 1e6).collect(),
                BLUE,
                Some("y"),
            ),
            line_series(
                "Transactions",
                days,
                data.daily.iter().map(|d| d.count as f64).collect(),
                ORANGE,
                8,
                "y2",
            ),
        ],
        dual_axis_layout(
            "Daily Transaction Patterns",
            "Volume (KES Millions)",
            Axis::secondary("Number of Transactions", ORANGE),
            400,
            STANDARD_MARGIN,
        ),
    )
}

pub fn failure_treemap(data: &Dataset) -> Figure {
    let counts: Vec<f64> = data.failures.iter().map(|f| f.count as f64).collect();

    let treemap = Treemap {
        labels: data.failures.iter().map(|f| f.reason.clone()).collect(),
        parents: vec![String::new(); data.failures.len()],
        values: counts.clone(),
        textinfo: "label+value+percent parent".to_string(),
        hovertemplate: Some(
            "<b>%{label}</b><br>Count: %{value}<br>Percentage: %{percentParent:.1%}<extra></extra>"
                .to_string(),
        ),
        marker: Some(Marker {
            colors: Some(Colors::Scaled(counts)),
            colorscale: Some(vec![
                (0.0, "#ffebee".to_string()),
                (1.0, "#c62828".to_string()),
            ]),
            showscale: Some(true),
            ..Default::default()
        }),
        textfont: Some(Font::sized(13)),
    };

    Figure::new(
        vec![Trace::Treemap(treemap)],
        Layout {
            title: Some(Title::Text("Transaction Failure Distribution".to_string())),
            height: Some(400),
            margin: Some(Margin::new(20, 20, 50, 20)),
            ..Default::default()
        },
    )
}

pub fn hourly_pattern(data: &Dataset) -> Figure {
    let hours: Vec<String> = data.hourly.iter().map(|h| h.hour.clone()).collect();

    let x_axis = Axis {
        tickangle: Some(-45),
        tickmode: Some("array".to_string()),
        ticktext: Some(hours.clone()),
        tickvals: Some((0..hours.len()).map(|i| i as f64).collect()),
        ..Axis::titled("Hour of Day")
    };

    let mut layout = dual_axis_layout(
        "Hourly Volume and Transaction Count Distribution",
        "Volume (KES Millions)",
        Axis::secondary("Number of Transactions", ORANGE),
        350,
        Margin::new(50, 50, 50, 100),
    );
    layout.xaxis = Some(x_axis);

    Figure::new(
        vec![
            line_series(
                "Volume",
                Values::Labels(hours.clone()),
                data.hourly.iter().map(|h| h.volume / 1e6).collect(),
                BLUE,
                6,
                "y",
            ),
            line_series(
                "Transaction Count",
                Values::Labels(hours),
                data.hourly.iter().map(|h| h.count as f64).collect(),
                ORANGE,
                6,
                "y2",
            ),
        ],
        layout,
    )
}

// ============================================================================
// CLIENTS
// ============================================================================

pub fn client_share(data: &Dataset) -> Figure {
    let pie = Pie {
        labels: data.clients.iter().map(|c| c.client.clone()).collect(),
        values: data.clients.iter().map(|c| c.volume).collect(),
        textinfo: "label+percent".to_string(),
        hole: 0.4,
        marker: Some(Marker {
            colors: Some(Colors::Palette(
                CLIENT_PALETTE.iter().map(|c| c.to_string()).collect(),
            )),
            ..Default::default()
        }),
        hovertemplate: Some(
            "<b>%{label}</b><br>Volume: KES %{value:,.2f}<br>Share: %{percent}<extra></extra>"
                .to_string(),
        ),
    };

    Figure::new(
        vec![Trace::Pie(pie)],
        Layout {
            title: Some(Title::Placed {
                text: "Transaction Volume by Client".to_string(),
                x: 0.5,
                y: 0.95,
                xanchor: "center".to_string(),
                yanchor: "top".to_string(),
            }),
            height: Some(400),
            margin: Some(Margin::new(20, 20, 50, 20)),
            showlegend: Some(true),
            legend: Some(Legend {
                orientation: "v".to_string(),
                x: 1.1,
                y: 0.5,
                xanchor: "left".to_string(),
                yanchor: Some("middle".to_string()),
                font: Some(Font::sized(11)),
            }),
            ..Default::default()
        },
    )
}

pub fn client_performance(data: &Dataset) -> Figure {
    let clients = labels(data.clients.iter().map(|c| &c.client));

    let mut layout = dual_axis_layout(
        "Client Transaction Activity",
        "Number of Transactions",
        Axis::secondary("Market Share (%)", ORANGE),
        400,
        Margin::new(50, 50, 50, 100),
    );
    layout.xaxis = Some(Axis {
        tickangle: Some(-45),
        ..Default::default()
    });

    Figure::new(
        vec![
            bar_series(
                "Transactions",
                clients.clone(),
                data.clients.iter().map(|c| c.transactions as f64).collect(),
                BLUE,
                Some("y"),
            ),
            line_series(
                "Market Share (%)",
                clients,
                data.clients.iter().map(|c| c.market_share).collect(),
                ORANGE,
                8,
                "y2",
            ),
        ],
        layout,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Summary;
    use serde_json::Value;

    fn fixtures() -> (Dataset, Summary) {
        let data = Dataset::load().unwrap();
        let summary = Summary::compute(&data).unwrap();
        (data, summary)
    }

    fn json(figure: &Figure) -> Value {
        serde_json::to_value(figure).unwrap()
    }

    #[test]
    fn test_monthly_trends_scales_volume_to_millions() {
        let (data, _) = fixtures();
        let fig = json(&monthly_trends(&data));

        assert_eq!(fig["data"][0]["type"], "bar");
        assert_eq!(fig["data"][0]["x"][0], "January");
        let january = fig["data"][0]["y"][0].as_f64().unwrap();
        assert!((january - 2013.68781126).abs() < 1e-6);

        assert_eq!(fig["data"][1]["type"], "scatter");
        assert_eq!(fig["data"][1]["yaxis"], "y2");
        assert_eq!(fig["data"][1]["y"][4], 99.05);
        assert_eq!(fig["layout"]["yaxis2"]["range"], serde_json::json!([90.0, 100.0]));
        assert_eq!(fig["layout"]["legend"]["orientation"], "h");
    }

    #[test]
    fn test_gauge_shows_mean_success_rate() {
        let (_, summary) = fixtures();
        let fig = json(&success_gauge(&summary));

        let indicator = &fig["data"][0];
        assert_eq!(indicator["type"], "indicator");
        assert_eq!(indicator["value"].as_f64().unwrap(), summary.mean_success_rate);
        assert_eq!(indicator["gauge"]["threshold"]["value"].as_f64().unwrap(), summary.mean_success_rate);
        assert_eq!(indicator["gauge"]["steps"].as_array().unwrap().len(), 3);
        assert_eq!(indicator["gauge"]["steps"][2]["color"], "rgba(0, 100, 0, 0.6)");
    }

    #[test]
    fn test_user_activity_numbers() {
        let (_, summary) = fixtures();
        let fig = json(&user_activity(&summary));

        let values = &fig["data"][2]["text"];
        assert_eq!(values[0], "64");
        assert_eq!(values[1], "282,769");
        assert_eq!(values[2], "750,249");
        assert_eq!(fig["layout"]["xaxis"]["showticklabels"], false);
    }

    #[test]
    fn test_pies_use_volume() {
        let (data, _) = fixtures();

        let countries = json(&geographic(&data));
        assert_eq!(countries["data"][0]["labels"].as_array().unwrap().len(), 10);
        assert_eq!(countries["data"][0]["hole"], 0.3);
        assert_eq!(countries["data"][0]["values"][2], 11_315_946_583.70);

        let clients = json(&client_share(&data));
        assert_eq!(clients["data"][0]["labels"][0], "Lemfi");
        assert_eq!(clients["data"][0]["hole"], 0.4);
        assert_eq!(clients["data"][0]["marker"]["colors"].as_array().unwrap().len(), 8);
        assert_eq!(clients["layout"]["title"]["text"], "Transaction Volume by Client");
    }

    #[test]
    fn test_failure_treemap_is_flat() {
        let (data, _) = fixtures();
        let fig = json(&failure_treemap(&data));
        let treemap = &fig["data"][0];

        assert_eq!(treemap["type"], "treemap");
        assert!(treemap["parents"].as_array().unwrap().iter().all(|p| p == ""));
        let total: f64 = treemap["values"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap())
            .sum();
        assert_eq!(total, 59_929.0);
    }

    #[test]
    fn test_hourly_ticks_cover_every_bucket() {
        let (data, _) = fixtures();
        let fig = json(&hourly_pattern(&data));
        let xaxis = &fig["layout"]["xaxis"];

        assert_eq!(xaxis["tickangle"], -45);
        assert_eq!(xaxis["ticktext"].as_array().unwrap().len(), 48);
        assert_eq!(xaxis["tickvals"][47], 47.0);
        assert_eq!(xaxis["title"]["text"], "Hour of Day");
        assert_eq!(fig["layout"]["height"], 350);
        assert_eq!(fig["data"][1]["name"], "Transaction Count");
    }

    #[test]
    fn test_daily_and_client_dual_axes() {
        let (data, _) = fixtures();

        let daily = json(&daily_pattern(&data));
        assert_eq!(daily["data"][1]["y"][4], 348_966.0);
        assert_eq!(daily["layout"]["yaxis2"]["title"]["text"], "Number of Transactions");

        let clients = json(&client_performance(&data));
        assert_eq!(clients["data"][0]["y"][0], 836_080.0);
        assert_eq!(clients["data"][1]["y"][0], 42.60);
        assert_eq!(clients["layout"]["xaxis"]["tickangle"], -45);
    }

    #[test]
    fn test_monthly_users_grouped() {
        let (data, _) = fixtures();
        let fig = json(&monthly_users(&data));
        assert_eq!(fig["layout"]["barmode"], "group");
        assert_eq!(fig["data"][1]["name"], "Recipients");
        assert!(fig["data"][0].get("yaxis").is_none());
    }
}
