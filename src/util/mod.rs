const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const USER_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const USER_ID_LEN: usize = 16;

/// "Last saved" format, e.g. `May 12, 2:45p.m.`. `month0` is zero-based.
pub(crate) fn saved_time_display(month0: u32, day: u32, hour: u32, minute: u32) -> String {
    let month = MONTH_NAMES[(month0 as usize) % 12];
    let (h, suffix) = if hour >= 12 {
        (hour - 12, "p.m.")
    } else {
        (hour, "a.m.")
    };
    let h = if h == 0 { 12 } else { h };
    format!("{month} {day}, {h}:{minute:02}{suffix}")
}

pub(crate) fn current_time_display() -> String {
    // Use system local timezone (browser runtime).
    let d = js_sys::Date::new_0();
    saved_time_display(d.get_month(), d.get_date(), d.get_hours(), d.get_minutes())
}

/// Random alphanumeric id used to tell concurrent editors apart.
pub(crate) fn generate_user_id() -> String {
    let mut bytes = [0u8; USER_ID_LEN];
    if getrandom::getrandom(&mut bytes).is_err() {
        for b in bytes.iter_mut() {
            *b = (js_sys::Math::random() * 256.0) as u8;
        }
    }

    bytes
        .iter()
        .map(|b| USER_ID_ALPHABET[*b as usize % USER_ID_ALPHABET.len()] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_time_display_afternoon() {
        assert_eq!(saved_time_display(4, 12, 14, 45), "May 12, 2:45p.m.");
    }

    #[test]
    fn test_saved_time_display_midnight_and_noon() {
        assert_eq!(saved_time_display(0, 1, 0, 5), "January 1, 12:05a.m.");
        assert_eq!(saved_time_display(11, 31, 12, 0), "December 31, 12:00p.m.");
    }

    #[test]
    fn test_generate_user_id_shape() {
        let a = generate_user_id();
        let b = generate_user_id();
        assert_eq!(a.len(), USER_ID_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}

/// Real-time wait for browser tests that drive window timers.
#[cfg(all(test, target_arch = "wasm32"))]
pub(crate) async fn sleep_ms(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(win) = web_sys::window() {
            let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}
