use std::fmt::Write;
use std::path::PathBuf;

use glit_core::ReportView;
use glit_engine::ExportError;
use html_escape::{encode_double_quoted_attribute, encode_text};

const STYLE: &str = "body{font-family:sans-serif;margin:2rem}table{border-collapse:collapse}\
td,th{border:1px solid #ccc;padding:.3rem .6rem;text-align:left;vertical-align:top}\
.error{color:#a00}";

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title><style>{STYLE}</style></head>\n<body>\n{body}</body></html>\n",
        encode_text(title)
    )
}

/// Search form prefilled with the profile URL, used to retry or refine a run.
fn search_again(profile_url: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/search\">\n  <input type=\"url\" name=\"userUrl\" size=\"60\" required value=\"{}\">\n  <button type=\"submit\">Search again</button> <a href=\"/\">New search</a>\n</form>\n",
        encode_double_quoted_attribute(profile_url)
    )
}

pub fn render_form() -> String {
    page(
        "glit",
        r#"<h1>glit</h1>
<form method="post" action="/search">
  <p><label>User URL <input type="url" name="userUrl" size="60" required placeholder="https://api.github.com/users/octocat"></label></p>
  <p><label><input type="checkbox" name="allBranches" value="true"> All branches</label></p>
  <p><label><input type="checkbox" name="saveToFile" value="true"> Save results to file</label></p>
  <p><button type="submit">Search</button></p>
</form>
"#,
    )
}

pub fn render_results(
    profile_url: &str,
    view: &ReportView,
    export: &Option<Result<PathBuf, ExportError>>,
    generated: &str,
) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>Results for {}</h1>", encode_text(profile_url));
    let _ = writeln!(
        body,
        "<p>{} addresses across {} repositories, generated {}</p>",
        view.email_count,
        view.repository_count,
        encode_text(generated)
    );
    match export {
        Some(Ok(path)) => {
            let shown = path.display().to_string();
            let _ = writeln!(body, "<p>Saved to <code>{}</code></p>", encode_text(&shown));
        }
        Some(Err(err)) => {
            let message = err.to_string();
            let _ = writeln!(body, "<p class=\"error\">Export failed: {}</p>", encode_text(&message));
        }
        None => {}
    }

    body.push_str("<table>\n<tr><th>Repository</th><th>Emails</th></tr>\n");
    for row in &view.rows {
        let emails = row
            .emails
            .iter()
            .map(|email| encode_text(email))
            .collect::<Vec<_>>()
            .join("<br>");
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{emails}</td></tr>",
            encode_text(&row.repository)
        );
    }
    body.push_str("</table>\n");
    body.push_str(&search_again(profile_url));
    page("glit results", &body)
}

pub fn render_error(profile_url: &str, message: &str) -> String {
    let mut body = format!(
        "<h1>Search failed</h1>\n<p>Could not list repositories for <code>{}</code>.</p>\n<p class=\"error\">{}</p>\n",
        encode_text(profile_url),
        encode_text(message)
    );
    body.push_str(&search_again(profile_url));
    page("glit error", &body)
}
