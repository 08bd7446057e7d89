// src/tour_data.rs
use serde::{Deserialize, Serialize};

/// Top-level tour configuration as loaded from JSON. A config may declare
/// several groups but only the first one is ever shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourConfig {
    pub groups: Vec<Group>,
}

/// One complete guided tour: an ordered list of slides with hotspots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub images: Vec<TourImage>,
}

/// One slide. The `(x, y)` offset and `scale` describe the coordinate frame
/// the hotspots were authored in (the capture may be a sub-region of a larger
/// canvas, possibly captured at a non-1 scale).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourImage {
    /// Displayable bitmap reference (URL or data URI).
    #[serde(alias = "base64")]
    pub src: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub boxes: Vec<Hotspot>,
}

/// A clickable authored rectangle on a slide that gates progression.
/// Coordinates are in the parent image's authoring frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TourConfig {
    /// The group the viewer runs. `None` when the config declares no groups,
    /// which callers must treat as an invalid configuration.
    pub fn first_group(&self) -> Option<&Group> {
        self.groups.first()
    }
}

impl Group {
    pub fn hotspot_count(&self, image_index: usize) -> usize {
        self.images.get(image_index).map_or(0, |img| img.boxes.len())
    }

    /// Total steps in the tour: the sum of hotspot counts across all slides.
    pub fn total_steps(&self) -> usize {
        self.images.iter().map(|img| img.boxes.len()).sum()
    }
}

impl TourImage {
    /// Authoring-time scale of this capture. Absent or zero means unscaled.
    pub fn authoring_scale(&self) -> f64 {
        match self.scale {
            Some(s) if s != 0.0 => s,
            _ => 1.0,
        }
    }
}

impl Default for TourImage {
    fn default() -> Self {
        Self {
            src: String::new(),
            title: None,
            x: 0.0,
            y: 0.0,
            scale: None,
            boxes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_with_boxes(n: usize) -> TourImage {
        TourImage {
            src: "data:image/png;base64,xyz".to_string(),
            boxes: (0..n)
                .map(|i| Hotspot {
                    x: i as f64 * 10.0,
                    y: 0.0,
                    width: 5.0,
                    height: 5.0,
                    title: None,
                    description: None,
                })
                .collect(),
            ..TourImage::default()
        }
    }

    #[test]
    fn test_total_steps_sums_all_boxes() {
        let group = Group {
            title: "Demo".to_string(),
            description: None,
            images: vec![image_with_boxes(2), image_with_boxes(0), image_with_boxes(1)],
        };
        assert_eq!(group.total_steps(), 3);
        assert_eq!(group.hotspot_count(0), 2);
        assert_eq!(group.hotspot_count(1), 0);
        assert_eq!(group.hotspot_count(99), 0);
    }

    #[test]
    fn test_authoring_scale_defaults() {
        let mut img = image_with_boxes(0);
        assert_eq!(img.authoring_scale(), 1.0);
        img.scale = Some(0.0);
        assert_eq!(img.authoring_scale(), 1.0);
        img.scale = Some(2.0);
        assert_eq!(img.authoring_scale(), 2.0);
    }

    #[test]
    fn test_config_json_round_trip() {
        let json = r#"{
            "groups": [{
                "title": "Onboarding",
                "description": "Welcome **aboard**",
                "images": [{
                    "base64": "data:image/png;base64,abc",
                    "x": 12.5,
                    "y": 4.0,
                    "scale": 2.0,
                    "boxes": [
                        { "x": 100, "y": 100, "width": 50, "height": 50, "title": "Menu" }
                    ]
                }]
            }]
        }"#;
        let config: TourConfig = serde_json::from_str(json).expect("valid config");
        let group = config.first_group().expect("one group");
        assert_eq!(group.title, "Onboarding");
        assert_eq!(group.total_steps(), 1);
        assert_eq!(group.images[0].src, "data:image/png;base64,abc");
        assert_eq!(group.images[0].authoring_scale(), 2.0);
        assert_eq!(group.images[0].boxes[0].title.as_deref(), Some("Menu"));
    }

    #[test]
    fn test_empty_config_has_no_group() {
        let config = TourConfig { groups: Vec::new() };
        assert!(config.first_group().is_none());
    }
}
