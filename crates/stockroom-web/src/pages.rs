//! Full pages.

use crate::forms::{AddProductForm, DrawStockForm};
use crate::templates::{
    alert, card, empty_state, html_escape, input, layout, money, select, stats_card,
    submit_button, table,
};
use stockroom_core::{Category, CurrentUser, InventorySummary, Product};

/// Login page, optionally with an error and the username to prefill.
pub fn login_page(error: Option<&str>, username: &str) -> String {
    let form = format!(
        r##"<form method="POST" action="/login" class="space-y-5 max-w-md">
            {username_input}
            {password_input}
            {submit}
        </form>"##,
        username_input = input("username", "Username", "text", username, "required autofocus"),
        password_input = input("password", "Password", "password", "", "required"),
        submit = submit_button("Sign In", "sign-in-alt"),
    );
    let content = format!("{}{}", alert(error), card("Sign in to continue", &form));
    layout("Login", None, &content)
}

/// Inventory dashboard.
pub fn dashboard_page(user: &CurrentUser, products: &[Product]) -> String {
    let listing = if products.is_empty() {
        empty_state("box", "No products yet", "Products added by a manager will appear here.")
    } else {
        let rows: Vec<Vec<String>> = products
            .iter()
            .map(|p| {
                vec![
                    p.id.to_string(),
                    html_escape(&p.name),
                    html_escape(&p.category_name),
                    money(p.unit_price),
                    p.stock_quantity.to_string(),
                ]
            })
            .collect();
        table(&["ID", "Name", "Category", "Unit Price", "Stock"], &rows)
    };

    let greeting = format!(
        r#"<p class="text-gray-600">Signed in as <strong>{}</strong> ({}).</p>"#,
        html_escape(user.username()),
        html_escape(user.role().name()),
    );
    let content = format!("{greeting}{}", card("Current Inventory", &listing));
    layout("Inventory", Some(user), &content)
}

/// Add-product form, re-populated with `form` after a failed submission.
pub fn add_product_page(
    user: &CurrentUser,
    categories: &[Category],
    error: Option<&str>,
    form: &AddProductForm,
) -> String {
    let options: Vec<(String, String, bool)> = categories
        .iter()
        .map(|c| {
            let id = c.id.to_string();
            let selected = form.category_id.trim() == id;
            (id, c.name.clone(), selected)
        })
        .collect();

    let body = format!(
        r##"<form method="POST" action="/add-product" class="space-y-4 max-w-lg">
            {name}
            {category}
            {price}
            {quantity}
            {submit}
        </form>"##,
        name = input("name", "Product Name", "text", &form.name, "required"),
        category = select("category_id", "Category", "Select a category", &options),
        price = input(
            "unit_price",
            "Unit Price",
            "number",
            &form.unit_price,
            r#"min="0" step="0.01" required"#,
        ),
        quantity = input(
            "stock_quantity",
            "Initial Stock",
            "number",
            &form.stock_quantity,
            r#"min="0" step="1" required"#,
        ),
        submit = submit_button("Add Product", "plus"),
    );
    let content = format!("{}{}", alert(error), card("New Product", &body));
    layout("Add Product", Some(user), &content)
}

/// Draw-stock form, re-populated with `form` after a failed submission.
pub fn draw_stock_page(
    user: &CurrentUser,
    products: &[Product],
    error: Option<&str>,
    form: &DrawStockForm,
) -> String {
    let options: Vec<(String, String, bool)> = products
        .iter()
        .map(|p| {
            let id = p.id.to_string();
            let selected = form.product_id.trim() == id;
            let label = format!(
                "{} ({}) - {} in stock",
                p.name, p.category_name, p.stock_quantity
            );
            (id, label, selected)
        })
        .collect();

    let body = format!(
        r##"<form method="POST" action="/draw-stock" class="space-y-4 max-w-lg">
            {product}
            {quantity}
            {submit}
        </form>"##,
        product = select("product_id", "Product", "Select a product", &options),
        quantity = input(
            "quantity",
            "Quantity",
            "number",
            &form.quantity,
            r#"min="1" step="1" required"#,
        ),
        submit = submit_button("Draw Stock", "box-open"),
    );
    let content = format!("{}{}", alert(error), card("Withdraw Stock", &body));
    layout("Draw Stock", Some(user), &content)
}

/// Aggregate inventory figures.
pub fn summary_page(
    user: &CurrentUser,
    summary: &InventorySummary,
    low_stock_threshold: i64,
) -> String {
    let stats = format!(
        r#"<div class="grid grid-cols-1 md:grid-cols-2 gap-6">{}{}</div>"#,
        stats_card("Total Inventory Value", &money(summary.total_value), "coins", "green"),
        stats_card("Total Products", &summary.total_products.to_string(), "boxes", "indigo"),
    );

    let by_category = if summary.stock_by_category.is_empty() {
        empty_state("tags", "No stock", "There are no products in any category.")
    } else {
        let rows: Vec<Vec<String>> = summary
            .stock_by_category
            .iter()
            .map(|c| vec![html_escape(&c.category_name), c.total_stock.to_string()])
            .collect();
        table(&["Category", "Total Stock"], &rows)
    };

    let low_stock = if summary.low_stock_items.is_empty() {
        empty_state("check-circle", "All stocked up", "No product is running low.")
    } else {
        let rows: Vec<Vec<String>> = summary
            .low_stock_items
            .iter()
            .map(|item| vec![html_escape(&item.name), item.stock_quantity.to_string()])
            .collect();
        table(&["Product", "Stock"], &rows)
    };

    let content = format!(
        "{stats}{}{}",
        card("Stock by Category", &by_category),
        card(&format!("Low Stock (below {low_stock_threshold})"), &low_stock),
    );
    layout("Inventory Summary", Some(user), &content)
}

/// Body of a 403 response.
pub fn access_denied_page(message: &str) -> String {
    layout(
        "Access Denied",
        None,
        &format!(
            r#"{}<p><a href="/" class="text-indigo-600 hover:underline">Back to inventory</a></p>"#,
            alert(Some(message))
        ),
    )
}
