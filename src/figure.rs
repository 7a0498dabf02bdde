// Chart specifications - serialized as Plotly figure JSON
//
// Only the attributes the dashboard uses are modelled. Unset options are left
// out of the JSON so Plotly applies its own defaults.

use serde::Serialize;

pub const BLUE: &str = "rgba(26, 118, 255, 0.8)";
pub const ORANGE: &str = "rgba(255, 128, 0, 0.8)";

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn new(data: Vec<Trace>, layout: Layout) -> Self {
        Figure { data, layout }
    }

    /// Rendered height in pixels, if the layout fixes one
    pub fn height(&self) -> Option<u32> {
        self.layout.height
    }

    /// Trace array and layout object, as Plotly.newPlot takes them
    pub fn to_json_parts(&self) -> serde_json::Result<(String, String)> {
        Ok((
            serde_json::to_string(&self.data)?,
            serde_json::to_string(&self.layout)?,
        ))
    }
}

// ============================================================================
// TRACES
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar(Bar),
    Scatter(Scatter),
    Pie(Pie),
    Indicator(Indicator),
    Treemap(Treemap),
}

/// Category labels or numeric positions along an axis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Values {
    Labels(Vec<String>),
    Numbers(Vec<f64>),
}

impl Default for Values {
    fn default() -> Self {
        Values::Numbers(Vec::new())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Bar {
    pub name: String,
    pub x: Values,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Scatter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: Values,
    pub y: Vec<f64>,
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textfont: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Pie {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub textinfo: String,
    pub hole: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Indicator {
    pub mode: String,
    pub value: f64,
    pub title: IndicatorTitle,
    pub number: IndicatorNumber,
    pub gauge: Gauge,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IndicatorTitle {
    pub text: String,
    pub font: Font,
    pub align: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IndicatorNumber {
    pub suffix: String,
    pub font: Font,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Gauge {
    pub axis: GaugeAxis,
    pub bar: GaugeBar,
    pub steps: Vec<GaugeStep>,
    pub threshold: GaugeThreshold,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GaugeAxis {
    pub range: [f64; 2],
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GaugeBar {
    pub color: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GaugeStep {
    pub range: [f64; 2],
    pub color: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GaugeThreshold {
    pub line: Line,
    pub thickness: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Treemap {
    pub labels: Vec<String>,
    pub parents: Vec<String>,
    pub values: Vec<f64>,
    pub textinfo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textfont: Option<Font>,
}

// ============================================================================
// STYLE
// ============================================================================

#[derive(Debug, Clone, Default, Serialize)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Colors>,
    /// (position, color) stops
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorscale: Option<Vec<(f64, String)>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showscale: Option<bool>,
}

impl Marker {
    pub fn solid(color: &str) -> Self {
        Marker {
            color: Some(color.to_string()),
            ..Default::default()
        }
    }

    pub fn dot(color: &str, size: u32) -> Self {
        Marker {
            color: Some(color.to_string()),
            size: Some(size),
            ..Default::default()
        }
    }
}

/// Per-point colors: explicit palette or values mapped through a colorscale
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Colors {
    Palette(Vec<String>),
    Scaled(Vec<f64>),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Line {
    pub color: String,
    pub width: u32,
}

impl Line {
    pub fn new(color: &str, width: u32) -> Self {
        Line {
            color: color.to_string(),
            width,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Font {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Font {
    pub fn sized(size: u32) -> Self {
        Font {
            size: Some(size),
            color: None,
        }
    }

    pub fn colored(color: &str) -> Self {
        Font {
            size: None,
            color: Some(color.to_string()),
        }
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

#[derive(Debug, Clone, Default, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis2: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_bgcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Title {
    Text(String),
    Placed {
        text: String,
        x: f64,
        y: f64,
        xanchor: String,
        yanchor: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

impl Margin {
    pub fn new(l: u32, r: u32, t: u32, b: u32) -> Self {
        Margin { l, r, t, b }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Legend {
    pub orientation: String,
    pub x: f64,
    pub y: f64,
    pub xanchor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yanchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

impl Legend {
    /// Horizontal legend centered above the plot area
    pub fn top_center() -> Self {
        Legend {
            orientation: "h".to_string(),
            x: 0.5,
            y: 1.1,
            xanchor: "center".to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<AxisTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickfont: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlaying: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showgrid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zeroline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showticklabels: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickangle: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickmode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticktext: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickvals: Option<Vec<f64>>,
}

impl Axis {
    /// Value axis whose title and ticks share the series color
    pub fn tinted(title: &str, color: &str) -> Self {
        Axis {
            title: Some(AxisTitle {
                text: title.to_string(),
                font: Some(Font::colored(color)),
            }),
            tickfont: Some(Font::colored(color)),
            ..Default::default()
        }
    }

    /// Secondary axis drawn on the right over the primary one
    pub fn secondary(title: &str, color: &str) -> Self {
        Axis {
            overlaying: Some("y".to_string()),
            side: Some("right".to_string()),
            ..Axis::tinted(title, color)
        }
    }

    pub fn titled(title: &str) -> Self {
        Axis {
            title: Some(AxisTitle {
                text: title.to_string(),
                font: None,
            }),
            ..Default::default()
        }
    }

    /// No grid, zero line or tick labels
    pub fn hidden(range: [f64; 2]) -> Self {
        Axis {
            range: Some(range),
            showgrid: Some(false),
            zeroline: Some(false),
            showticklabels: Some(false),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AxisTitle {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trace_is_tagged_with_type() {
        let trace = Trace::Bar(Bar {
            name: "Volume".to_string(),
            x: Values::Labels(vec!["January".to_string()]),
            y: vec![2013.68],
            marker: Some(Marker::solid(BLUE)),
            yaxis: Some("y".to_string()),
        });

        let value = serde_json::to_value(&trace).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "bar",
                "name": "Volume",
                "x": ["January"],
                "y": [2013.68],
                "marker": {"color": BLUE},
                "yaxis": "y"
            })
        );
    }

    #[test]
    fn test_unset_options_are_omitted() {
        let layout = Layout {
            height: Some(300),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&layout).unwrap(), json!({"height": 300}));
    }

    #[test]
    fn test_secondary_axis() {
        let axis = Axis::secondary("Success Rate (%)", ORANGE);
        let value = serde_json::to_value(&axis).unwrap();

        assert_eq!(value["overlaying"], "y");
        assert_eq!(value["side"], "right");
        assert_eq!(value["title"]["text"], "Success Rate (%)");
        assert_eq!(value["title"]["font"]["color"], ORANGE);
        assert_eq!(value["tickfont"]["color"], ORANGE);
    }

    #[test]
    fn test_colorscale_serializes_as_pairs() {
        let marker = Marker {
            colors: Some(Colors::Scaled(vec![833.0, 11376.0])),
            colorscale: Some(vec![(0.0, "#ffebee".to_string()), (1.0, "#c62828".to_string())]),
            showscale: Some(true),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&marker).unwrap(),
            json!({
                "colors": [833.0, 11376.0],
                "colorscale": [[0.0, "#ffebee"], [1.0, "#c62828"]],
                "showscale": true
            })
        );
    }

    #[test]
    fn test_placed_title() {
        let title = Title::Placed {
            text: "Transaction Volume by Client".to_string(),
            x: 0.5,
            y: 0.95,
            xanchor: "center".to_string(),
            yanchor: "top".to_string(),
        };
        let value = serde_json::to_value(&title).unwrap();
        assert_eq!(value["text"], "Transaction Volume by Client");
        assert_eq!(value["xanchor"], "center");

        let plain = serde_json::to_value(Title::Text("Monthly Active Users".to_string())).unwrap();
        assert_eq!(plain, json!("Monthly Active Users"));
    }
}
