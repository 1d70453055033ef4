//! Resolution-independent figure descriptions attached to geometry questions.
//!
//! A figure is a canvas size plus an ordered list of primitive shapes in canvas
//! coordinates (origin top-left, y down). Rendering is left to the client.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Figure {
  pub width: f64,
  pub height: f64,
  pub shapes: Vec<Shape>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
  Start,
  Middle,
  End,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
  Rect { x: f64, y: f64, width: f64, height: f64, filled: bool },
  Polygon { points: Vec<[f64; 2]>, filled: bool },
  Circle { cx: f64, cy: f64, r: f64, filled: bool },
  Line { x1: f64, y1: f64, x2: f64, y2: f64, dashed: bool },
  /// Square corner marker; `(x, y)` is the vertex, `dx`/`dy` point into the angle.
  RightAngle { x: f64, y: f64, dx: f64, dy: f64 },
  Label {
    x: f64,
    y: f64,
    text: String,
    anchor: Anchor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rotate: Option<f64>,
    accent: bool,
  },
}

fn label(x: f64, y: f64, text: &str, anchor: Anchor) -> Shape {
  Shape::Label { x, y, text: text.to_string(), anchor, rotate: None, accent: true }
}

const MARK: f64 = 12.0;

/// Axis-aligned rectangle scaled so its longer side spans 140px of a 240×200 canvas.
pub fn rectangle(width: f64, height: f64, width_label: &str, height_label: &str) -> Figure {
  let (cw, ch) = (240.0, 200.0);
  let scale = 140.0 / width.max(height);
  let (w, h) = (width * scale, height * scale);
  let (x, y) = ((cw - w) / 2.0, (ch - h) / 2.0);
  Figure {
    width: cw,
    height: ch,
    shapes: vec![
      Shape::Rect { x, y, width: w, height: h, filled: true },
      label(cw / 2.0, y + h + 20.0, width_label, Anchor::Middle),
      label(x + w + 10.0, ch / 2.0, height_label, Anchor::Start),
    ],
  }
}

/// Where the apex of a triangle sits relative to its base.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Apex {
  /// Directly above the left end of the base.
  Right,
  /// Offset from the left end by this many pixels.
  Skewed(f64),
}

/// Triangle with a dashed height line and labelled base and height on a 240×180 canvas.
pub fn triangle(base: f64, height: f64, apex: Apex, base_label: &str, height_label: &str) -> Figure {
  let (cw, ch) = (240.0, 180.0);
  let scale = 140.0 / base.max(height);
  let (b, h) = (base * scale, height * scale);
  let (x0, y0) = ((cw - b) / 2.0, ch - (ch - h) / 2.0);
  let apex_x = match apex {
    Apex::Right => x0,
    Apex::Skewed(skew) => x0 + skew,
  };
  let mut shapes = vec![
    Shape::Polygon { points: vec![[x0, y0], [x0 + b, y0], [apex_x, y0 - h]], filled: true },
    Shape::Line { x1: apex_x, y1: y0 - h, x2: apex_x, y2: y0, dashed: true },
  ];
  let marker_dx = if apex == Apex::Right { MARK } else { -MARK };
  shapes.push(Shape::RightAngle { x: apex_x, y: y0, dx: marker_dx, dy: -MARK });
  shapes.push(label(x0 + b / 2.0, y0 + 20.0, base_label, Anchor::Middle));
  shapes.push(label(apex_x - 5.0, y0 - h / 2.0, height_label, Anchor::End));
  Figure { width: cw, height: ch, shapes }
}

/// Rectangle with a triangle whose base lies on the rectangle's bottom edge and whose
/// apex touches the top edge `split_px` pixels from the base's left end.
pub fn triangle_in_rectangle(
  rect_width: f64,
  rect_height: f64,
  base: f64,
  split_px: f64,
  width_label: &str,
  height_label: &str,
  base_label: &str,
) -> Figure {
  let (cw, ch) = (240.0, 180.0);
  let scale = 140.0 / rect_width.max(rect_height);
  let (w, h) = (rect_width * scale, rect_height * scale);
  let b = base * scale;
  let (x0, y0) = ((cw - w) / 2.0, (ch - h) / 2.0);
  let base_left = x0 + (w - b) / 2.0;
  let apex_x = base_left + split_px.clamp(0.0, b);
  Figure {
    width: cw,
    height: ch,
    shapes: vec![
      Shape::Rect { x: x0, y: y0, width: w, height: h, filled: false },
      Shape::Polygon { points: vec![[base_left, y0 + h], [base_left + b, y0 + h], [apex_x, y0]], filled: true },
      label(x0 + w / 2.0, y0 - 8.0, width_label, Anchor::Middle),
      label(x0 + w + 8.0, y0 + h / 2.0, height_label, Anchor::Start),
      label(base_left + b / 2.0, y0 + h + 18.0, base_label, Anchor::Middle),
    ],
  }
}

/// Circle of radius 75px on a 180×180 canvas with a labelled radius or diameter.
pub fn circle(label_text: &str, show_diameter: bool) -> Figure {
  let (c, r) = (90.0, 75.0);
  let x1 = if show_diameter { c - r } else { c };
  Figure {
    width: 180.0,
    height: 180.0,
    shapes: vec![
      Shape::Circle { cx: c, cy: c, r, filled: true },
      Shape::Circle { cx: c, cy: c, r: 3.0, filled: true },
      Shape::Line { x1, y1: c, x2: c + r, y2: c, dashed: false },
      label((x1 + c + r) / 2.0, c - 8.0, label_text, Anchor::Middle),
    ],
  }
}

/// Right triangle with legs along the bottom and right edges, longer leg spanning 160px
/// of a 220×200 canvas. The hypotenuse label is rotated to follow the edge.
pub fn right_triangle(base: f64, height: f64, base_label: &str, height_label: &str, hyp_label: &str) -> Figure {
  let (cw, ch) = (220.0, 200.0);
  let scale = 160.0 / base.max(height);
  let (b, h) = (base * scale, height * scale);
  let (x0, y0) = ((cw - b) / 2.0, ch - (ch - h) / 2.0);
  let corner_x = x0 + b;
  let angle = -(h / b).atan().to_degrees();
  Figure {
    width: cw,
    height: ch,
    shapes: vec![
      Shape::Polygon { points: vec![[x0, y0], [corner_x, y0], [corner_x, y0 - h]], filled: true },
      Shape::RightAngle { x: corner_x, y: y0, dx: -MARK, dy: -MARK },
      label(x0 + b / 2.0, y0 + 18.0, base_label, Anchor::Middle),
      label(corner_x + 8.0, y0 - h / 2.0, height_label, Anchor::Start),
      Shape::Label {
        x: x0 + b / 2.0 - 10.0,
        y: y0 - h / 2.0 - 10.0,
        text: hyp_label.to_string(),
        anchor: Anchor::Middle,
        rotate: Some(angle),
        accent: true,
      },
    ],
  }
}

/// Front view of a small box resting centred on a larger one.
pub fn stacked_boxes(lower: (f64, f64), upper: (f64, f64), lower_labels: (&str, &str), upper_labels: (&str, &str)) -> Figure {
  let (cw, ch) = (240.0, 220.0);
  let scale = 150.0 / lower.0.max(lower.1 + upper.1);
  let (lw, lh) = (lower.0 * scale, lower.1 * scale);
  let (uw, uh) = (upper.0 * scale, upper.1 * scale);
  let x0 = (cw - lw) / 2.0;
  let ground = ch - (ch - lh - uh) / 2.0;
  let ux = x0 + (lw - uw) / 2.0;
  Figure {
    width: cw,
    height: ch,
    shapes: vec![
      Shape::Rect { x: x0, y: ground - lh, width: lw, height: lh, filled: true },
      Shape::Rect { x: ux, y: ground - lh - uh, width: uw, height: uh, filled: true },
      label(x0 + lw / 2.0, ground + 18.0, lower_labels.0, Anchor::Middle),
      label(x0 + lw + 8.0, ground - lh / 2.0, lower_labels.1, Anchor::Start),
      label(ux + uw / 2.0, ground - lh - uh - 8.0, upper_labels.0, Anchor::Middle),
      label(ux + uw + 8.0, ground - lh - uh / 2.0, upper_labels.1, Anchor::Start),
    ],
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn labels(f: &Figure) -> Vec<&str> {
    f.shapes
      .iter()
      .filter_map(|s| match s {
        Shape::Label { text, .. } => Some(text.as_str()),
        _ => None,
      })
      .collect()
  }

  fn within_canvas(f: &Figure) -> bool {
    f.shapes.iter().all(|s| match s {
      Shape::Rect { x, y, width, height, .. } => *x >= 0.0 && *y >= 0.0 && x + width <= f.width && y + height <= f.height,
      Shape::Polygon { points, .. } => points.iter().all(|[x, y]| *x >= 0.0 && *y >= 0.0 && *x <= f.width && *y <= f.height),
      _ => true,
    })
  }

  #[test]
  fn rectangle_scales_longer_side() {
    let f = rectangle(12.0, 6.0, "12cm", "6cm");
    match &f.shapes[0] {
      Shape::Rect { width, height, .. } => {
        assert!((width - 140.0).abs() < 1e-9);
        assert!((height - 70.0).abs() < 1e-9);
      }
      other => panic!("unexpected first shape {other:?}"),
    }
    assert_eq!(labels(&f), vec!["12cm", "6cm"]);
    assert!(within_canvas(&f));
  }

  #[test]
  fn right_triangle_rotates_hypotenuse_label() {
    let f = right_triangle(3.0, 4.0, "3cm", "4cm", "x");
    let rotate = f.shapes.iter().find_map(|s| match s {
      Shape::Label { rotate: Some(r), .. } => Some(*r),
      _ => None,
    });
    let r = rotate.expect("rotated label");
    assert!((r + (4.0f64 / 3.0).atan().to_degrees()).abs() < 1e-9);
    assert!(within_canvas(&f));
  }

  #[test]
  fn shapes_serialize_with_kind_tag() {
    let f = circle("5cm", false);
    let v = serde_json::to_value(&f).unwrap();
    assert_eq!(v["shapes"][0]["kind"], "circle");
    assert_eq!(v["shapes"][0]["r"], 75.0);
    assert_eq!(v["width"], 180.0);
  }

  #[test]
  fn composite_figures_stay_on_canvas() {
    assert!(within_canvas(&triangle_in_rectangle(10.0, 6.0, 6.0, 30.0, "10cm", "6cm", "6cm")));
    assert!(within_canvas(&triangle(8.0, 5.0, Apex::Skewed(40.0), "8cm", "5cm")));
    assert!(within_canvas(&stacked_boxes((6.0, 4.0), (3.0, 2.0), ("6cm", "4cm"), ("3cm", "2cm"))));
  }
}
