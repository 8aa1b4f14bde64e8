use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WayfindError};

/// Axis-aligned blocked rectangle. Informational only: the search never reads
/// obstacles, it relies on the corridor definitions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HorizontalCorridor {
    pub y: f64,
    pub x_start: f64,
    pub x_end: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerticalCorridor {
    pub x: f64,
    pub y_start: f64,
    pub y_end: f64,
}

impl VerticalCorridor {
    pub fn contains_y(&self, y: f64) -> bool {
        self.y_start <= y && y <= self.y_end
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Corridors {
    #[serde(default)]
    pub horizontal: Vec<HorizontalCorridor>,
    #[serde(default)]
    pub vertical: Vec<VerticalCorridor>,
    /// Secondary horizontal spans that route around in-aisle displays.
    #[serde(default)]
    pub horizontal_bypass: Vec<HorizontalCorridor>,
}

impl Corridors {
    /// Main and bypass horizontal corridors, main ones first.
    pub fn all_horizontal(&self) -> impl Iterator<Item = &HorizontalCorridor> {
        self.horizontal.iter().chain(self.horizontal_bypass.iter())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    pub corridors: Corridors,
}

impl Layout {
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| WayfindError::Configuration(format!("layout json: {e}")))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| WayfindError::Configuration(format!("read {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Reject corridors and obstacles that cannot describe a walkable floor.
    pub fn validate(&self) -> Result<()> {
        for (i, o) in self.obstacles.iter().enumerate() {
            if ![o.x, o.y, o.width, o.height].iter().all(|v| v.is_finite()) {
                return Err(WayfindError::Configuration(format!("obstacle {i} has non-finite geometry")));
            }
            if o.width <= 0.0 || o.height <= 0.0 {
                return Err(WayfindError::Configuration(format!("obstacle {i} has non-positive size")));
            }
        }
        let check_h = |kind: &str, i: usize, c: &HorizontalCorridor| -> Result<()> {
            if ![c.y, c.x_start, c.x_end].iter().all(|v| v.is_finite()) {
                return Err(WayfindError::Configuration(format!("{kind} corridor {i} has non-finite geometry")));
            }
            if c.x_end <= c.x_start {
                return Err(WayfindError::Configuration(format!(
                    "{kind} corridor {i} spans x {}..{} (zero-length or reversed)",
                    c.x_start, c.x_end
                )));
            }
            Ok(())
        };
        for (i, c) in self.corridors.horizontal.iter().enumerate() {
            check_h("horizontal", i, c)?;
        }
        for (i, c) in self.corridors.horizontal_bypass.iter().enumerate() {
            check_h("bypass", i, c)?;
        }
        for (i, c) in self.corridors.vertical.iter().enumerate() {
            if ![c.x, c.y_start, c.y_end].iter().all(|v| v.is_finite()) {
                return Err(WayfindError::Configuration(format!("vertical corridor {i} has non-finite geometry")));
            }
            if c.y_end <= c.y_start {
                return Err(WayfindError::Configuration(format!(
                    "vertical corridor {i} spans y {}..{} (zero-length or reversed)",
                    c.y_start, c.y_end
                )));
            }
        }
        Ok(())
    }

    /// The single-floor supermarket the engine ships with.
    pub fn store() -> Self {
        let ob = |x: f64, y: f64, width: f64, height: f64, label: &str| Obstacle {
            x,
            y,
            width,
            height,
            label: Some(label.to_string()),
        };
        let h = |y: f64, x_start: f64, x_end: f64| HorizontalCorridor { y, x_start, x_end };
        let v = |x: f64, y_start: f64, y_end: f64| VerticalCorridor { x, y_start, y_end };

        let mut obstacles = vec![
            ob(295.0, 30.0, 45.0, 90.0, "checkout-1"),
            ob(395.0, 30.0, 45.0, 90.0, "checkout-2"),
            ob(495.0, 30.0, 45.0, 90.0, "checkout-3"),
            ob(595.0, 30.0, 45.0, 90.0, "checkout-4"),
            ob(705.0, 50.0, 60.0, 70.0, "cart-area"),
            ob(10.0, 190.0, 80.0, 230.0, "dairy"),
            ob(910.0, 190.0, 80.0, 230.0, "produce"),
            ob(100.0, 170.0, 100.0, 100.0, "display-d1"),
            ob(720.0, 290.0, 100.0, 100.0, "display-d2"),
        ];
        for (i, x) in [230.0, 280.0, 360.0, 410.0, 490.0, 540.0, 620.0, 670.0].into_iter().enumerate() {
            obstacles.push(ob(x, 200.0, 45.0, 180.0, &format!("aisle-{}", i + 1)));
        }
        obstacles.extend([
            ob(110.0, 460.0, 120.0, 110.0, "meat"),
            ob(395.0, 490.0, 180.0, 80.0, "frozen"),
            ob(770.0, 460.0, 120.0, 110.0, "bakery"),
        ]);

        Layout {
            obstacles,
            corridors: Corridors {
                horizontal: vec![h(150.0, 90.0, 900.0), h(410.0, 90.0, 900.0)],
                vertical: vec![
                    v(210.0, 150.0, 410.0),
                    v(342.0, 150.0, 410.0),
                    v(472.0, 150.0, 410.0),
                    v(602.0, 150.0, 410.0),
                    // right of aisle 8, split by display D2
                    v(735.0, 150.0, 270.0),
                    v(735.0, 410.0, 450.0),
                    v(890.0, 150.0, 450.0),
                ],
                horizontal_bypass: vec![h(270.0, 735.0, 890.0), h(410.0, 735.0, 890.0)],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn store_layout_is_valid() {
        let l = Layout::store();
        l.validate().unwrap();
        assert_eq!(l.obstacles.len(), 20);
        assert_eq!(l.corridors.vertical.len(), 7);
        assert_eq!(l.corridors.all_horizontal().count(), 4);
    }

    #[test]
    fn reversed_span_is_a_configuration_error() {
        let mut l = Layout::store();
        l.corridors.vertical[0].y_end = l.corridors.vertical[0].y_start;
        assert!(matches!(l.validate(), Err(WayfindError::Configuration(_))));

        let mut l = Layout::store();
        l.corridors.horizontal_bypass[0].x_start = 1000.0;
        assert!(matches!(l.validate(), Err(WayfindError::Configuration(_))));
    }

    #[test]
    fn parses_json_with_missing_optional_lists() {
        let v = json!({
            "corridors": {
                "horizontal": [{ "y": 150.0, "x_start": 90.0, "x_end": 900.0 }],
                "vertical": [{ "x": 210.0, "y_start": 150.0, "y_end": 410.0 }]
            }
        });
        let l = Layout::from_json_str(&v.to_string()).unwrap();
        assert!(l.obstacles.is_empty());
        assert!(l.corridors.horizontal_bypass.is_empty());
        assert_eq!(l.corridors.vertical[0].x, 210.0);
    }

    #[test]
    fn malformed_json_is_a_configuration_error() {
        let err = Layout::from_json_str("{\"corridors\": 3}").unwrap_err();
        assert!(matches!(err, WayfindError::Configuration(_)));
    }
}
