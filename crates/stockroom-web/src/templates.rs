//! HTML building blocks.
//!
//! Pages are assembled from these with `format!`. Every value that came from
//! a user or the database must pass through [`html_escape`] first.

use stockroom_core::CurrentUser;

/// Base HTML layout wrapper.
pub fn layout(title: &str, user: Option<&CurrentUser>, content: &str) -> String {
    let nav = user.map(nav_template).unwrap_or_default();
    let title = html_escape(title);
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Stockroom</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css">
</head>
<body class="bg-gray-50 min-h-screen">
    {nav}
    <main class="p-6 lg:p-8">
        <div class="max-w-6xl mx-auto space-y-6">
            <h1 class="text-2xl font-semibold text-gray-900">{title}</h1>
            {content}
        </div>
    </main>
</body>
</html>"##
    )
}

fn nav_template(user: &CurrentUser) -> String {
    let manage_links = if user.is_admin() || user.is_manager() {
        r##"<a href="/add-product" class="hover:underline"><i class="fas fa-plus"></i> Add Product</a>
                <a href="/draw-stock" class="hover:underline"><i class="fas fa-box-open"></i> Draw Stock</a>"##
    } else {
        ""
    };
    let role_color = if user.is_admin() {
        "red"
    } else if user.is_manager() {
        "yellow"
    } else {
        "gray"
    };
    format!(
        r##"<nav class="bg-indigo-700 text-white px-6 py-3 shadow">
        <div class="max-w-6xl mx-auto flex items-center justify-between">
            <div class="flex items-center gap-6">
                <a href="/" class="font-bold"><i class="fas fa-warehouse"></i> Stockroom</a>
                <a href="/" class="hover:underline">Inventory</a>
                {manage_links}
                <a href="/summary" class="hover:underline"><i class="fas fa-chart-bar"></i> Summary</a>
            </div>
            <div class="flex items-center gap-3 text-sm">
                <span>{username}</span>
                {role}
                <a href="/logout" class="bg-indigo-600 hover:bg-indigo-500 px-3 py-1 rounded">Log out</a>
            </div>
        </div>
    </nav>"##,
        username = html_escape(user.username()),
        role = badge(&html_escape(user.role().name()), role_color),
    )
}

/// Error banner. Empty when there is no message.
pub fn alert(message: Option<&str>) -> String {
    match message {
        Some(message) => format!(
            r##"<div class="p-4 bg-red-50 border border-red-200 rounded-lg text-red-700" role="alert">
            <i class="fas fa-exclamation-circle"></i> {}
        </div>"##,
            html_escape(message)
        ),
        None => String::new(),
    }
}

/// Card component.
pub fn card(title: &str, content: &str) -> String {
    format!(
        r##"<div class="bg-white rounded-xl shadow-sm border border-gray-200 overflow-hidden">
            <div class="px-6 py-4 border-b border-gray-200">
                <h3 class="text-lg font-semibold text-gray-900">{title}</h3>
            </div>
            <div class="p-6">
                {content}
            </div>
        </div>"##
    )
}

/// Stats card component.
pub fn stats_card(title: &str, value: &str, icon: &str, color: &str) -> String {
    format!(
        r##"<div class="bg-white rounded-xl shadow-sm border border-gray-200 p-6">
            <div class="flex items-center justify-between">
                <div>
                    <p class="text-sm text-gray-500">{title}</p>
                    <p class="text-2xl font-bold text-gray-900 mt-1">{value}</p>
                </div>
                <div class="w-12 h-12 rounded-full bg-{color}-100 flex items-center justify-center">
                    <i class="fas fa-{icon} text-{color}-500 text-xl"></i>
                </div>
            </div>
        </div>"##
    )
}

/// Badge component.
pub fn badge(text: &str, color: &str) -> String {
    format!(
        r##"<span class="inline-flex items-center px-2.5 py-0.5 rounded-full text-xs font-medium bg-{color}-100 text-{color}-800">{text}</span>"##
    )
}

/// Table component. Cells are inserted as-is.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let headers_html: String = headers
        .iter()
        .map(|h| format!(r#"<th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">{h}</th>"#))
        .collect();

    let rows_html: String = rows
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|cell| format!(r#"<td class="px-6 py-4 whitespace-nowrap text-sm text-gray-900">{cell}</td>"#))
                .collect();
            format!(r#"<tr class="hover:bg-gray-50">{cells}</tr>"#)
        })
        .collect();

    format!(
        r##"<div class="overflow-x-auto">
            <table class="min-w-full divide-y divide-gray-200">
                <thead class="bg-gray-50">
                    <tr>{headers_html}</tr>
                </thead>
                <tbody class="bg-white divide-y divide-gray-200">
                    {rows_html}
                </tbody>
            </table>
        </div>"##
    )
}

/// Input field component. `value` is escaped here.
pub fn input(name: &str, label: &str, input_type: &str, value: &str, extra_attrs: &str) -> String {
    let value = html_escape(value);
    format!(
        r##"<div class="space-y-1">
            <label for="{name}" class="block text-sm font-medium text-gray-700">{label}</label>
            <input type="{input_type}" name="{name}" id="{name}" value="{value}" {extra_attrs}
                   class="w-full px-4 py-2 border border-gray-300 rounded-lg bg-white text-gray-900 focus:ring-2 focus:ring-indigo-500">
        </div>"##
    )
}

/// Select field component. Option values and texts are escaped here.
pub fn select(name: &str, label: &str, placeholder: &str, options: &[(String, String, bool)]) -> String {
    let options_html: String = options
        .iter()
        .map(|(value, text, selected)| {
            let value = html_escape(value);
            let text = html_escape(text);
            if *selected {
                format!(r#"<option value="{value}" selected>{text}</option>"#)
            } else {
                format!(r#"<option value="{value}">{text}</option>"#)
            }
        })
        .collect();

    format!(
        r##"<div class="space-y-1">
            <label for="{name}" class="block text-sm font-medium text-gray-700">{label}</label>
            <select name="{name}" id="{name}"
                    class="w-full px-4 py-2 border border-gray-300 rounded-lg bg-white text-gray-900 focus:ring-2 focus:ring-indigo-500">
                <option value="">{placeholder}</option>
                {options_html}
            </select>
        </div>"##
    )
}

/// Primary submit button.
pub fn submit_button(text: &str, icon: &str) -> String {
    format!(
        r##"<button type="submit" class="bg-indigo-600 hover:bg-indigo-700 text-white px-4 py-2 rounded-lg font-medium transition-colors">
            <i class="fas fa-{icon}"></i> {text}
        </button>"##
    )
}

/// Empty state component.
pub fn empty_state(icon: &str, title: &str, description: &str) -> String {
    format!(
        r##"<div class="text-center py-12">
            <i class="fas fa-{icon} text-4xl text-gray-400 mb-4"></i>
            <h3 class="text-lg font-medium text-gray-900">{title}</h3>
            <p class="mt-1 text-gray-500">{description}</p>
        </div>"##
    )
}

/// Simple HTML escape function
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Format a money amount with two decimals.
pub fn money(amount: f64) -> String {
    format!("{amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#x27;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_alert_escapes_message() {
        assert!(alert(Some("<b>")).contains("&lt;b&gt;"));
        assert!(alert(None).is_empty());
    }

    #[test]
    fn test_select_marks_selected_option() {
        let html = select(
            "category_id",
            "Category",
            "Choose",
            &[
                ("1".into(), "Tools".into(), false),
                ("2".into(), "Paint & Co".into(), true),
            ],
        );
        assert!(html.contains(r#"<option value="2" selected>Paint &amp; Co</option>"#));
        assert!(html.contains(r#"<option value="1">Tools</option>"#));
    }

    #[test]
    fn test_money() {
        assert_eq!(money(0.0), "0.00");
        assert_eq!(money(1050.0), "1050.00");
        assert_eq!(money(2.3456), "2.35");
    }
}
