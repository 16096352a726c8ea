use std::fmt::Write as _;

use super::layout::{Canvas, GraphLayout};

const NODE_RADIUS: f64 = 10.0;

/// Render a computed layout as a standalone SVG document.
pub fn render_svg(layout: &GraphLayout, canvas: &Canvas) -> String {
    let mut svg = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}" style="overflow: visible">"#,
        canvas.width, canvas.height, canvas.width, canvas.height
    );
    svg.push_str(
        r##"  <defs>
    <marker id="arrowhead" markerWidth="10" markerHeight="7" refX="9" refY="3.5" orient="auto" fill="#60a5fa">
      <polygon points="0 0, 10 3.5, 0 7" />
    </marker>
  </defs>
"##,
    );

    for edge in &layout.edges {
        let path_id = format!("edgepath-{}", edge.index);
        let _ = writeln!(
            svg,
            r##"  <g class="edge">
    <path id="{path_id}" d="{}" fill="none" stroke="#4b5563" stroke-width="1.5" marker-end="url(#arrowhead)" />
    <text dy="-5" text-anchor="middle" fill="#9ca3af" font-size="10px" letter-spacing="0.05em">
      <textPath href="#{path_id}" startOffset="{}%">{}</textPath>
    </text>
  </g>"##,
            edge.path,
            edge.label_offset * 100.0,
            escape_xml(&edge.label)
        );
    }

    for node in &layout.nodes {
        let _ = writeln!(
            svg,
            r##"  <g class="node" transform="translate({}, {})">
    <circle r="{NODE_RADIUS}" fill="#2563eb" stroke="#93c5fd" stroke-width="2" />
    <text y="{}" text-anchor="middle" fill="#e5e7eb" font-size="11px" font-weight="bold">"##,
            node.position.x,
            node.position.y,
            -NODE_RADIUS - 5.0
        );
        for (i, line) in node.label_lines.iter().enumerate() {
            let dy = if i > 0 { "1.2em" } else { "0" };
            let _ = writeln!(
                svg,
                r#"      <tspan x="0" dy="{dy}">{}</tspan>"#,
                escape_xml(line)
            );
        }
        svg.push_str("    </text>\n  </g>\n");
    }

    svg.push_str("</svg>\n");
    svg
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
