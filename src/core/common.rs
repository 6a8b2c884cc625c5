//! # Shared Component Props
//!
//! Layout state every widget in the form carries alongside its own
//! fields: margins, minimum sizes, grow flags, alignment, and the
//! reconciliation key. Diff batches mix these into the same flat record
//! as the widget's fields, and they always apply before the widget's
//! own handling so shared layout bookkeeping settles first.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::protocol::ComponentId;

/// Sibling components named by a batch but not attached to the form
/// yet. Container widgets claim children out of this set; leaf widgets
/// pass it through untouched.
pub type LatentComponents = HashSet<ComponentId>;

/// Resolved layout state of one component.
///
/// Margins are in terminal cells. `align_x`/`align_y` follow the
/// 0.0..=1.0 convention (0.0 = leading edge, 1.0 = trailing edge);
/// `None` means the component stretches to fill its slot on that axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonProps {
    pub key: Option<String>,
    pub margin: Option<u16>,
    pub margin_x: Option<u16>,
    pub margin_y: Option<u16>,
    pub margin_left: Option<u16>,
    pub margin_top: Option<u16>,
    pub margin_right: Option<u16>,
    pub margin_bottom: Option<u16>,
    pub min_width: u16,
    pub min_height: u16,
    pub grow_x: bool,
    pub grow_y: bool,
    pub align_x: Option<f64>,
    pub align_y: Option<f64>,
}

/// Partial update of [`CommonProps`]. `None` means "no change", never
/// "reset to default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_x: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_y: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_right: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grow_x: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grow_y: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_y: Option<f64>,
}

impl CommonProps {
    /// Applies the present fields of `diff`, leaving the rest alone.
    ///
    /// Every widget calls this before touching its own fields. `latent`
    /// flows through for container widgets; this leaf-level handling
    /// never consumes it.
    pub fn apply(&mut self, diff: &CommonDiff, _latent: &mut LatentComponents) {
        if let Some(v) = &diff.key {
            self.key = Some(v.clone());
        }
        if let Some(v) = diff.margin {
            self.margin = Some(v);
        }
        if let Some(v) = diff.margin_x {
            self.margin_x = Some(v);
        }
        if let Some(v) = diff.margin_y {
            self.margin_y = Some(v);
        }
        if let Some(v) = diff.margin_left {
            self.margin_left = Some(v);
        }
        if let Some(v) = diff.margin_top {
            self.margin_top = Some(v);
        }
        if let Some(v) = diff.margin_right {
            self.margin_right = Some(v);
        }
        if let Some(v) = diff.margin_bottom {
            self.margin_bottom = Some(v);
        }
        if let Some(v) = diff.min_width {
            self.min_width = v;
        }
        if let Some(v) = diff.min_height {
            self.min_height = v;
        }
        if let Some(v) = diff.grow_x {
            self.grow_x = v;
        }
        if let Some(v) = diff.grow_y {
            self.grow_y = v;
        }
        if let Some(v) = diff.align_x {
            self.align_x = Some(v);
        }
        if let Some(v) = diff.align_y {
            self.align_y = Some(v);
        }
    }

    // Per-side margins resolve specific → axis → uniform → 0.

    pub fn effective_margin_left(&self) -> u16 {
        self.margin_left.or(self.margin_x).or(self.margin).unwrap_or(0)
    }

    pub fn effective_margin_right(&self) -> u16 {
        self.margin_right.or(self.margin_x).or(self.margin).unwrap_or(0)
    }

    pub fn effective_margin_top(&self) -> u16 {
        self.margin_top.or(self.margin_y).or(self.margin).unwrap_or(0)
    }

    pub fn effective_margin_bottom(&self) -> u16 {
        self.margin_bottom.or(self.margin_y).or(self.margin).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margins_default_to_zero() {
        let props = CommonProps::default();
        assert_eq!(props.effective_margin_left(), 0);
        assert_eq!(props.effective_margin_right(), 0);
        assert_eq!(props.effective_margin_top(), 0);
        assert_eq!(props.effective_margin_bottom(), 0);
    }

    #[test]
    fn test_specific_margin_beats_axis_and_uniform() {
        let props = CommonProps {
            margin: Some(4),
            margin_x: Some(2),
            margin_left: Some(1),
            ..Default::default()
        };
        assert_eq!(props.effective_margin_left(), 1);
        // Right has no specific override, so the axis value applies.
        assert_eq!(props.effective_margin_right(), 2);
        // Vertical sides fall back to the uniform margin.
        assert_eq!(props.effective_margin_top(), 4);
        assert_eq!(props.effective_margin_bottom(), 4);
    }

    #[test]
    fn test_apply_touches_only_present_fields() {
        let mut props = CommonProps {
            min_width: 10,
            min_height: 2,
            grow_x: true,
            align_x: Some(0.5),
            ..Default::default()
        };
        let mut latent = LatentComponents::new();
        let diff = CommonDiff {
            min_height: Some(5),
            ..Default::default()
        };
        props.apply(&diff, &mut latent);
        assert_eq!(props.min_height, 5);
        assert_eq!(props.min_width, 10);
        assert!(props.grow_x);
        assert_eq!(props.align_x, Some(0.5));
    }

    #[test]
    fn test_apply_sets_key_and_alignment() {
        let mut props = CommonProps::default();
        let mut latent = LatentComponents::new();
        let diff = CommonDiff {
            key: Some("draft".to_string()),
            align_y: Some(1.0),
            grow_y: Some(true),
            ..Default::default()
        };
        props.apply(&diff, &mut latent);
        assert_eq!(props.key.as_deref(), Some("draft"));
        assert_eq!(props.align_y, Some(1.0));
        assert!(props.grow_y);
    }

    #[test]
    fn test_apply_leaves_latent_set_untouched() {
        use crate::protocol::ComponentId;

        let mut props = CommonProps::default();
        let mut latent = LatentComponents::from([ComponentId(9)]);
        let diff = CommonDiff {
            margin: Some(1),
            ..Default::default()
        };
        props.apply(&diff, &mut latent);
        assert_eq!(latent.len(), 1);
        assert!(latent.contains(&ComponentId(9)));
    }

    #[test]
    fn test_diff_parses_from_flat_record() {
        let diff: CommonDiff =
            serde_json::from_str(r#"{ "margin_x": 2, "min_height": 3 }"#).expect("parse");
        assert_eq!(diff.margin_x, Some(2));
        assert_eq!(diff.min_height, Some(3));
        assert_eq!(diff.margin, None);
        assert_eq!(diff.key, None);
    }
}
