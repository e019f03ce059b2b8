//! HTML pages. Graphs are drawn by Plotly.js in the browser.

use crate::dashboard::{escape_html, Dashboard, SlotContent};
use std::collections::BTreeMap;
use std::fmt::Write;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Posts every dropdown change with the full current selection and applies the returned slots.
const CLIENT_SCRIPT: &str = r#"
const base = '/' + document.body.dataset.dashboard;
function apply(outputs) {
  for (const [id, content] of Object.entries(outputs)) {
    const el = document.getElementById(id);
    if (!el) continue;
    if (content.kind === 'caption') {
      el.textContent = content.text;
    } else {
      Plotly.react(el, content.figure.data, content.figure.layout);
    }
  }
}
function inputs() {
  const values = {};
  document.querySelectorAll('select[data-selector]').forEach(s => {
    values[s.id] = JSON.parse(s.value);
  });
  return values;
}
apply(JSON.parse(document.getElementById('initial-slots').textContent));
document.querySelectorAll('select[data-selector]').forEach(s => {
  s.addEventListener('change', async () => {
    const response = await fetch(base + '/_dash-update-component', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ changed: s.id, inputs: inputs() }),
    });
    if (response.ok) {
      apply((await response.json()).outputs);
    } else {
      console.error(await response.text());
    }
  });
});
"#;

pub fn dashboard_page(
    dashboard: &Dashboard,
    slots: &BTreeMap<String, SlotContent>,
) -> Result<String, serde_json::Error> {
    let initial = serde_json::to_string(slots)?.replace("</", "<\\/");

    let mut body = String::new();
    dashboard.spec().layout.render_html(slots, &mut body);

    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <script src=\"{PLOTLY_CDN}\"></script>\n</head>\n\
         <body data-dashboard=\"{id}\">\n{body}\n\
         <script id=\"initial-slots\" type=\"application/json\">{initial}</script>\n\
         <script>{CLIENT_SCRIPT}</script>\n</body>\n</html>\n",
        title = escape_html(dashboard.title()),
        id = escape_html(dashboard.id()),
    );
    Ok(html)
}

pub fn index_page<'a>(dashboards: impl IntoIterator<Item = &'a Dashboard>) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Bee Dashboards</title>\n\
         </head>\n<body>\n<h1>Bee Dashboards</h1>\n<ul>\n",
    );
    for dashboard in dashboards {
        let _ = writeln!(
            html,
            "<li><a href=\"/{}\">{}</a></li>",
            escape_html(dashboard.id()),
            escape_html(dashboard.title())
        );
    }
    html.push_str("</ul>\n</body>\n</html>\n");
    html
}
