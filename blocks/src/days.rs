use gtfs::DaysOfWeek;

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Describes the weekdays a service operates on, collapsing consecutive days into ranges:
/// "Mon-Fri", "Mon, Wed, Fri", "Sat-Sun". Services with no weekdays at all (maybe only defined by
/// calendar exceptions) are "No regular service days". Trips with an unknown service get an empty
/// string.
pub fn describe_days(days: Option<&DaysOfWeek>) -> String {
    match days {
        Some(days) => describe_pattern(days.to_array()),
        None => String::new(),
    }
}

/// Monday first
pub fn describe_pattern(operating: [bool; 7]) -> String {
    let mut result = String::new();
    let mut days_in_a_row = 0;

    for (idx, name) in DAY_NAMES.iter().enumerate() {
        if !operating[idx] {
            days_in_a_row = 0;
            continue;
        }
        let previous = idx > 0 && operating[idx - 1];
        let next = idx < 6 && operating[idx + 1];
        let was_empty = result.is_empty();

        if !was_empty {
            if !previous {
                result.push_str(", ");
            } else if days_in_a_row == 1 {
                // The second day of a run opens the range; days in the middle add nothing
                result.push('-');
            }
        }
        days_in_a_row += 1;

        if was_empty || !next || idx == 6 || !previous {
            result.push_str(name);
        }
    }

    if result.is_empty() {
        return "No regular service days".to_string();
    }
    result
}
