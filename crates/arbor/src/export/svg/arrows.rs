use std::collections::HashSet;

use svg::node::element::{Definitions, Marker, Path};

use arbor_core::{
    color::Color,
    geometry::Point,
    resource::{ArrowHead, EdgeDirection, LineStyle},
};

use crate::style::EdgeStyle;

fn head_name(head: ArrowHead) -> Option<&'static str> {
    match head {
        ArrowHead::Vee => Some("vee"),
        ArrowHead::Normal => Some("normal"),
        ArrowHead::Diamond => Some("diamond"),
        ArrowHead::Dot => Some("dot"),
        ArrowHead::None => None,
    }
}

fn head_path(head: ArrowHead) -> &'static str {
    match head {
        ArrowHead::Vee => "M 0 0 L 10 5 L 0 10 L 4 5 z",
        ArrowHead::Normal | ArrowHead::None => "M 0 0 L 10 5 L 0 10 z",
        ArrowHead::Diamond => "M 0 5 L 5 0 L 10 5 L 5 10 z",
        ArrowHead::Dot => "M 5 0 A 5 5 0 1 1 5 10 A 5 5 0 1 1 5 0 z",
    }
}

fn marker_id(name: &str, color: &Color) -> String {
    format!("arrow-{name}-{}", color.to_id_safe_string())
}

/// Creates one marker per arrow head and color in use
///
/// Markers are oriented with `auto-start-reverse`, so the same marker serves
/// both ends of a path.
pub fn create_marker_definitions(styles: &[EdgeStyle]) -> Definitions {
    let mut seen = HashSet::new();
    let mut defs = Definitions::new();
    for style in styles {
        if style.direction == EdgeDirection::None {
            continue;
        }
        let Some(name) = head_name(style.arrowhead) else {
            continue;
        };
        if !seen.insert((name, style.color)) {
            continue;
        }
        let marker = Marker::new()
            .set("id", marker_id(name, &style.color))
            .set("viewBox", "0 0 10 10")
            .set("refX", 9)
            .set("refY", 5)
            .set("markerWidth", 6)
            .set("markerHeight", 6)
            .set("orient", "auto-start-reverse")
            .add(
                Path::new()
                    .set("d", head_path(style.arrowhead))
                    .set("fill", style.color.to_string()),
            );
        defs = defs.add(marker);
    }

    defs
}

/// Get marker references for the ends of an edge
pub fn get_markers(style: &EdgeStyle) -> (Option<String>, Option<String>) {
    let Some(name) = head_name(style.arrowhead) else {
        return (None, None);
    };
    let marker = format!("url(#{})", marker_id(name, &style.color));
    match style.direction {
        EdgeDirection::Forward => (None, Some(marker)),
        EdgeDirection::Back => (Some(marker), None),
        EdgeDirection::Both => (Some(marker.clone()), Some(marker)),
        EdgeDirection::None => (None, None),
    }
}

/// Create a straight path for connecting two points with appropriate markers
pub fn create_path(start: Point, end: Point, style: &EdgeStyle) -> Path {
    let mut path = Path::new()
        .set(
            "d",
            format!("M {} {} L {} {}", start.x(), start.y(), end.x(), end.y()),
        )
        .set("fill", "none")
        .set("stroke", style.color.to_string())
        .set("stroke-width", style.width);

    match style.line {
        LineStyle::Solid => {}
        LineStyle::Dashed => path = path.set("stroke-dasharray", "8 4"),
        LineStyle::Dotted => path = path.set("stroke-dasharray", "2 4"),
    }

    let (start_marker, end_marker) = get_markers(style);
    if let Some(marker) = start_marker {
        path = path.set("marker-start", marker);
    }
    if let Some(marker) = end_marker {
        path = path.set("marker-end", marker);
    }

    path
}
