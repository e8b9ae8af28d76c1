//! Label rendering as SVG

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use super::barcode::{bar_runs, encode};
use super::{LabelData, ORDER_NO, PARTY_CODE};

pub const LABEL_WIDTH: u32 = 400;
pub const LABEL_HEIGHT: u32 = 300;

const TEXT_X: u32 = 10;
const TEXT_Y: u32 = 10;
const FONT_SIZE: u32 = 16;
const LINE_HEIGHT: u32 = 18;

const BARCODE_X: f64 = 100.0;
const BARCODE_Y: f64 = 220.0;
const BARCODE_WIDTH: f64 = 200.0;
const BARCODE_HEIGHT: f64 = 50.0;

/// Text printed on the label: order and party first, then the product fields
pub fn text_lines(label: &LabelData) -> Vec<String> {
    let mut lines = vec![
        format!("{}: {}", ORDER_NO, label.get(ORDER_NO).unwrap_or_default()),
        format!("{}: {}", PARTY_CODE, label.get(PARTY_CODE).unwrap_or_default()),
    ];
    lines.extend(
        label
            .fields()
            .iter()
            .filter(|(k, _)| !super::HIDDEN_FIELDS.contains(&k.as_str()))
            .map(|(k, v)| format!("{}: {}", k, v)),
    );
    lines
}

/// Render the label; fails when the product has no machine code
pub fn render_svg(label: &LabelData) -> Result<String> {
    let modules = encode(label.mach_code()?)?;
    let module_width = BARCODE_WIDTH / modules.len() as f64;

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    let (width, height) = (LABEL_WIDTH.to_string(), LABEL_HEIGHT.to_string());
    let view_box = format!("0 0 {} {}", LABEL_WIDTH, LABEL_HEIGHT);
    writer.write_event(Event::Start(BytesStart::new("svg").with_attributes([
        ("xmlns", "http://www.w3.org/2000/svg"),
        ("width", width.as_str()),
        ("height", height.as_str()),
        ("viewBox", view_box.as_str()),
    ])))?;
    writer.write_event(Event::Empty(
        BytesStart::new("rect").with_attributes([("width", "100%"), ("height", "100%"), ("fill", "white")]),
    ))?;

    let font_size = FONT_SIZE.to_string();
    writer.write_event(Event::Start(BytesStart::new("g").with_attributes([
        ("font-family", "Arial, sans-serif"),
        ("font-size", font_size.as_str()),
        ("fill", "black"),
    ])))?;
    let x = TEXT_X.to_string();
    for (i, line) in text_lines(label).iter().enumerate() {
        let y = (TEXT_Y + FONT_SIZE + i as u32 * LINE_HEIGHT).to_string();
        writer.write_event(Event::Start(
            BytesStart::new("text").with_attributes([("x", x.as_str()), ("y", y.as_str())]),
        ))?;
        writer.write_event(Event::Text(BytesText::new(line)))?;
        writer.write_event(Event::End(BytesEnd::new("text")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("g")))?;

    writer.write_event(Event::Start(BytesStart::new("g").with_attributes([("fill", "black")])))?;
    let (bar_y, bar_height) = (BARCODE_Y.to_string(), BARCODE_HEIGHT.to_string());
    for (start, run) in bar_runs(&modules) {
        let bar_x = format!("{:.3}", BARCODE_X + start as f64 * module_width);
        let bar_width = format!("{:.3}", run as f64 * module_width);
        writer.write_event(Event::Empty(BytesStart::new("rect").with_attributes([
            ("x", bar_x.as_str()),
            ("y", bar_y.as_str()),
            ("width", bar_width.as_str()),
            ("height", bar_height.as_str()),
        ])))?;
    }
    writer.write_event(Event::End(BytesEnd::new("g")))?;
    writer.write_event(Event::End(BytesEnd::new("svg")))?;

    let mut svg = String::from_utf8(writer.into_inner()).context("Label SVG is not valid UTF-8")?;
    svg.push('\n');
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label() -> LabelData {
        let mut label = LabelData::from_fields(vec![
            ("DESIGN NO".to_string(), "CM101".to_string()),
            ("MACH CODE".to_string(), "MC9001".to_string()),
            ("WT".to_string(), "12.5".to_string()),
            ("REMARK".to_string(), "R&D <sample>".to_string()),
        ]);
        label.set(ORDER_NO, "ORD-7");
        label
    }

    #[test]
    fn test_text_lines_order_and_hidden_fields() {
        let lines = text_lines(&label());
        assert_eq!(lines[0], "Order No: ORD-7");
        assert_eq!(lines[1], "Party Code: Default_Party");
        assert!(lines.contains(&"WT: 12.5".to_string()));
        assert!(lines.iter().all(|l| !l.starts_with("DESIGN NO")));
        assert_eq!(lines.iter().filter(|l| l.starts_with("Order No")).count(), 1);
    }

    #[test]
    fn test_svg_escapes_text_and_draws_bars() {
        let svg = render_svg(&label()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="400" height="300""#));
        assert!(svg.contains("R&amp;D &lt;sample&gt;"));
        assert!(svg.contains(r#"y="220""#));
        assert_eq!(svg.matches("<text ").count(), text_lines(&label()).len());
    }

    #[test]
    fn test_svg_escapes_markup_in_field_names() {
        let mut label = label();
        label.set("A<B", "</text><script>x & y");
        let svg = render_svg(&label).unwrap();
        assert!(svg.contains("A&lt;B: &lt;/text&gt;&lt;script&gt;x &amp; y"));
        assert!(!svg.contains("<script>"));
        assert_eq!(svg.matches("</text>").count(), text_lines(&label).len());
    }

    #[test]
    fn test_missing_mach_code_fails() {
        let label = LabelData::from_fields(vec![("DESIGN NO".to_string(), "CM1".to_string())]);
        let err = render_svg(&label).unwrap_err();
        assert!(err.to_string().contains("MACH CODE"));
    }
}
