use chrono_tz::TZ_VARIANTS;

/// Prints every known timezone name containing `filter`.
pub fn execute(filter: Option<&str>) {
    let names = matching(filter);
    for name in &names {
        println!("{name}");
    }
    if names.is_empty() {
        eprintln!("No timezones match \"{}\".", filter.unwrap_or_default());
        std::process::exit(1);
    }
}

fn matching(filter: Option<&str>) -> Vec<&'static str> {
    let needle = filter.map(str::to_ascii_lowercase);
    TZ_VARIANTS
        .iter()
        .map(|tz| tz.name())
        .filter(|name| {
            needle
                .as_deref()
                .is_none_or(|n| name.to_ascii_lowercase().contains(n))
        })
        .collect()
}
