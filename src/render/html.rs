//! Static HTML rendering of the lookup page.
//!
//! The element ids (`orderIdInput`, `loading`, `error`, `success`,
//! `resultSection`, `orderDetails`, `deliveryInfo`, `paymentInfo`,
//! `itemsBody`) are the host page contract; stylesheets and scripts hook
//! onto them.

use crate::view::{Field, ItemsView, OrderView, Section, ITEM_COLUMNS};
use crate::viewer::OrderViewer;

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2rem; color: #222; }
.search { display: flex; gap: 0.5rem; margin-bottom: 1rem; }
.banner { padding: 0.75rem 1rem; border-radius: 4px; margin-bottom: 1rem; }
.banner.error { background: #fde2e1; color: #a61b1b; }
.banner.success { background: #e2f6e5; color: #1b6b2a; }
.info-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 0.5rem; }
.info-item { display: flex; flex-direction: column; padding: 0.5rem; background: #f6f6f8; }
.info-label { font-size: 0.8rem; color: #666; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #ddd; padding: 0.4rem; text-align: left; }
";

/// Escape text for element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn display(visible: bool) -> &'static str {
    if visible {
        "block"
    } else {
        "none"
    }
}

fn info_item(field: &Field) -> String {
    format!(
        "<div class=\"info-item\"><span class=\"info-label\">{}</span><span class=\"info-value\">{}</span></div>\n",
        escape(field.label),
        escape(&field.value)
    )
}

fn fields_html(fields: &[Field]) -> String {
    fields.iter().map(info_item).collect()
}

pub fn section_html(section: &Section) -> String {
    match section {
        Section::Fields(fields) => fields_html(fields),
        Section::Missing(message) => format!(
            "<div class=\"info-item\"><span class=\"info-value\">{}</span></div>\n",
            escape(message)
        ),
    }
}

/// Rows for the items table body.
pub fn items_html(items: &ItemsView) -> String {
    match items {
        ItemsView::Rows(rows) => rows
            .iter()
            .map(|row| {
                let cells: String = row
                    .cells()
                    .iter()
                    .map(|cell| format!("<td>{}</td>", escape(cell)))
                    .collect();
                format!("<tr>{}</tr>\n", cells)
            })
            .collect(),
        ItemsView::Empty(message) => format!(
            "<tr><td colspan=\"{}\" style=\"text-align: center;\">{}</td></tr>\n",
            ITEM_COLUMNS.len(),
            escape(message)
        ),
    }
}

fn result_html(view: Option<&OrderView>) -> String {
    let (header, delivery, payment, items) = match view {
        Some(view) => (
            fields_html(&view.header),
            section_html(&view.delivery),
            section_html(&view.payment),
            items_html(&view.items),
        ),
        None => Default::default(),
    };

    let columns: String = ITEM_COLUMNS
        .iter()
        .map(|c| format!("<th>{}</th>", escape(c)))
        .collect();

    format!(
        r#"<div id="resultSection" style="display: {visible};">
<h2>Информация о заказе</h2>
<div id="orderDetails" class="info-grid">
{header}</div>
<h2>Доставка</h2>
<div id="deliveryInfo" class="info-grid">
{delivery}</div>
<h2>Оплата</h2>
<div id="paymentInfo" class="info-grid">
{payment}</div>
<h2>Товары</h2>
<table>
<thead><tr>{columns}</tr></thead>
<tbody id="itemsBody">
{items}</tbody>
</table>
</div>
"#,
        visible = display(view.is_some()),
    )
}

/// Render the whole page for the viewer's current state. `input` is echoed
/// into the identifier field.
pub fn render_page(viewer: &OrderViewer, input: &str) -> String {
    let error = viewer.error();
    let success = viewer.success();

    format!(
        r#"<!DOCTYPE html>
<html lang="ru">
<head>
<meta charset="utf-8">
<title>Поиск заказа</title>
<style>
{STYLE}</style>
</head>
<body>
<h1>Поиск заказа</h1>
<form class="search" method="get">
<input id="orderIdInput" name="order_id" type="text" placeholder="Введите ID заказа" value="{input}" autofocus>
<button id="searchButton" type="submit">Найти</button>
</form>
<div id="loading" style="display: {loading};">Загрузка...</div>
<div id="error" class="banner error" style="display: {error_visible};">{error_text}</div>
<div id="success" class="banner success" style="display: {success_visible};">{success_text}</div>
{result}</body>
</html>
"#,
        input = escape(input),
        loading = display(viewer.is_loading()),
        error_visible = display(error.is_some()),
        error_text = escape(error.unwrap_or_default()),
        success_visible = display(success.is_some()),
        success_text = escape(success.unwrap_or_default()),
        result = result_html(viewer.result()),
    )
}
