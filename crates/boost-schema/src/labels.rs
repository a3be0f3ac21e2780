//! Display labels for example payload files.
//!
//! An example file `<dir>_<stem>.json` is labelled by looking `<stem>` up in
//! a fixed table; unknown stems are title-cased (`forest_harvest` becomes
//! "Forest Harvest").

const KNOWN_LABELS: &[(&str, &str)] = &[
    ("example", "Standard Example"),
    ("carb_minimal", "CARB Minimal (Required Fields Only)"),
    ("carb_complete", "CARB Complete"),
    ("minimal", "Minimal (Required Fields Only)"),
    ("complete", "Complete (All Fields)"),
];

/// Human-facing label for the example file `file_stem` of entity directory
/// `dir_name`.
pub fn display_label(dir_name: &str, file_stem: &str) -> String {
    let prefix = format!("{dir_name}_");
    let key = file_stem.strip_prefix(&prefix).unwrap_or(file_stem);

    KNOWN_LABELS
        .iter()
        .find(|(stem, _)| *stem == key)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| title_case(key))
}

fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
