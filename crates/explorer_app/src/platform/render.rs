use std::fmt::Write;

use explorer_core::ListViewModel;
use explorer_engine::CatalogItem;

/// Text rendering of the list view for the terminal.
pub fn render(title: &str, view: &ListViewModel<CatalogItem>, updated_at: &str) -> String {
    let mut out = String::new();

    let added = match view.last_added {
        Some(added) => format!(" | last page added {added}"),
        None => String::new(),
    };
    let _ = writeln!(
        out,
        "== {} | offset {} | page size {} | {} item(s){} | updated {}",
        title,
        view.offset,
        view.limit,
        view.items.len(),
        added,
        updated_at
    );

    if view.loading {
        out.push_str("Loading...\n");
    }
    if let Some(error) = &view.last_error {
        let _ = writeln!(out, "Error: {error}");
    }

    for (index, item) in view.items.iter().enumerate() {
        let _ = writeln!(out, "{:>4}. {} [{}]", index + 1, item.title, item.key);
        for detail in &item.details {
            let _ = writeln!(out, "        {detail}");
        }
        if let Some(image) = &item.image_url {
            let _ = writeln!(out, "        image: {image}");
        }
    }

    let _ = writeln!(out, "{}", controls(view));
    out
}

fn controls(view: &ListViewModel<CatalogItem>) -> String {
    let button = |label: &str, enabled: bool| {
        if enabled {
            format!("[{label}]")
        } else {
            format!("({label})")
        }
    };
    [
        button("start", !view.loading),
        button("more", view.can_load_more),
        button("less", view.can_load_less),
        button("reset", true),
    ]
    .join(" ")
}
