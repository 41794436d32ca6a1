//! Page layout for the rendered report.

use std::fmt::Write as _;

use super::svg::escape;

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0 auto;max-width:1040px;padding:24px;color:#222}\
h1{margin-bottom:4px}h2{border-bottom:1px solid #ddd;padding-bottom:4px;margin-top:40px}\
.hero{max-width:100%;max-height:260px;display:block;margin:12px 0}\
.metrics{display:flex;gap:48px}.metric .label{color:#666;font-size:14px}\
.metric .value{font-size:32px;font-weight:600}\
svg{width:100%;height:auto}.axis{stroke:#444;stroke-width:1}\
.chart-title{font-size:20px;font-weight:600}.axis-label{font-size:15px}\
.tick{font-size:12px}.annotation{font-size:12px}\
footer{margin-top:40px;color:#888;font-size:13px}";

/// One headline metric.
pub(crate) struct Metric {
    pub label: &'static str,
    pub value: String,
}

/// A titled section holding pre-rendered SVG markup.
pub(crate) struct Section {
    pub heading: &'static str,
    pub metrics: Vec<Metric>,
    pub charts: Vec<String>,
}

/// Assemble the document. `sections` carry trusted SVG; every other string is escaped.
pub(crate) fn page(
    title: &str,
    hero_image: Option<&str>,
    sections: &[Section],
    conclusions: &[String],
) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<h1>{title}</h1>\n",
        title = escape(title)
    );
    if let Some(src) = hero_image {
        let _ = writeln!(
            out,
            "<img class=\"hero\" src=\"{}\" alt=\"\">",
            escape(src)
        );
    }

    for section in sections {
        let _ = writeln!(out, "<section>\n<h2>{}</h2>", escape(section.heading));
        if !section.metrics.is_empty() {
            out.push_str("<div class=\"metrics\">\n");
            for metric in &section.metrics {
                let _ = writeln!(
                    out,
                    "<div class=\"metric\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
                    escape(metric.label),
                    escape(&metric.value)
                );
            }
            out.push_str("</div>\n");
        }
        for chart in &section.charts {
            let _ = writeln!(out, "<figure>{chart}</figure>");
        }
        out.push_str("</section>\n");
    }

    out.push_str("<section>\n<h2>Conclusions</h2>\n<ol>\n");
    for line in conclusions {
        let _ = writeln!(out, "<li>{}</li>", escape(line));
    }
    out.push_str("</ol>\n</section>\n");
    out.push_str("<footer>Generated by ecommerce-dashboard</footer>\n</body>\n</html>\n");
    out
}
