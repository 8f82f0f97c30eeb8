// 徽章渲染

const LABEL_COLOR: &str = "#555";
pub const DEGRADED_COLOR: &str = "#9f9f9f";
pub const DEGRADED_VALUE: &str = "?";

// Verdana 11px 的近似字宽
const CHAR_WIDTH: usize = 7;
const PADDING: usize = 10;

fn text_width(text: &str) -> usize {
    text.chars().count() * CHAR_WIDTH + PADDING
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// 生成两段式平面徽章
pub fn render_badge(label: &str, value: &str, color: &str) -> String {
    let label_width = text_width(label);
    let value_width = text_width(value);
    let width = label_width + value_width;
    let label = escape(label);
    let value = escape(value);
    let color = escape(color);

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="20" role="img" aria-label="{label}: {value}">
<title>{label}: {value}</title>
<linearGradient id="s" x2="0" y2="100%"><stop offset="0" stop-color="#bbb" stop-opacity=".1"/><stop offset="1" stop-opacity=".1"/></linearGradient>
<clipPath id="r"><rect width="{width}" height="20" rx="3" fill="#fff"/></clipPath>
<g clip-path="url(#r)"><rect width="{label_width}" height="20" fill="{LABEL_COLOR}"/><rect x="{label_width}" width="{value_width}" height="20" fill="{color}"/><rect width="{width}" height="20" fill="url(#s)"/></g>
<g fill="#fff" text-anchor="middle" font-family="Verdana,Geneva,DejaVu Sans,sans-serif" font-size="11">
<text x="{label_x}" y="14">{label}</text>
<text x="{value_x}" y="14">{value}</text>
</g>
</svg>"##,
        label_x = label_width / 2,
        value_x = label_width + value_width / 2,
    )
}

pub fn render_degraded(label: &str) -> String {
    render_badge(label, DEGRADED_VALUE, DEGRADED_COLOR)
}
