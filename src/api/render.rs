//! Response bodies: the landing page, report attachments and the results page.

use axum::{
    body::Body,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde_json::Value;
use std::collections::BTreeSet;

use super::utils::content_disposition;
use crate::processor::{QueryContext, SampleRecord};

const LANDING_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>PAN-TORT</title></head>
<body>
<h1>PAN-TORT</h1>
<p>Palo Alto Networks Testing Output Response Toolkit.</p>
<p>Submit hashes with <code>POST /process_hashes</code> and a JSON body containing
<code>query_tag</code>, <code>hashes</code>, <code>output</code> and <code>hash_type</code>.</p>
</body>
</html>
"#;

pub fn landing_page() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

/// Report body as a forced download named `file_name`.
pub fn attachment(file_name: &str, contents: Body) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime::APPLICATION_OCTET_STREAM.to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(file_name)),
        ],
        contents,
    )
        .into_response()
}

/// Results table: one row per record, one column per field seen in any record.
pub fn results_page(ctx: &QueryContext, records: &[SampleRecord], kibana_url: &str) -> Html<String> {
    let columns: BTreeSet<&str> = records
        .iter()
        .flat_map(|record| record.fields.keys().map(String::as_str))
        .collect();

    let mut page = String::with_capacity(512 + records.len() * 128);
    page.push_str("<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>PAN-TORT results</title></head>\n<body>\n");
    page.push_str(&format!(
        "<h1>Results for {}</h1>\n<p>{} {} hash(es). <a href=\"{}/app/kibana#/discover\">Open in Kibana</a></p>\n",
        encode_text(&ctx.query_tag),
        records.len(),
        encode_text(&ctx.hash_type),
        encode_double_quoted_attribute(kibana_url),
    ));

    page.push_str("<table>\n<thead><tr><th>hash</th>");
    for column in &columns {
        page.push_str(&format!("<th>{}</th>", encode_text(column)));
    }
    page.push_str("</tr></thead>\n<tbody>\n");

    for record in records {
        page.push_str(&format!("<tr><td>{}</td>", encode_text(&record.hash)));
        for column in &columns {
            let cell = record.fields.get(*column).map(cell_text).unwrap_or_default();
            page.push_str(&format!("<td>{}</td>", encode_text(&cell)));
        }
        page.push_str("</tr>\n");
    }

    page.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    Html(page)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
