// Macros for user-facing output. Status lines go to stderr so stdout stays
// clean for `--format json`.

#[macro_export]
macro_rules! ui_ok {
    ($($arg:tt)*) => {{
        println!("✔ {}", format!($($arg)*));
    }};
}

#[macro_export]
macro_rules! ui_info {
    ($($arg:tt)*) => {{
        eprintln!("ℹ {}", format!($($arg)*));
    }};
}

#[macro_export]
macro_rules! ui_warn {
    ($($arg:tt)*) => {{
        use std::io::IsTerminal as _;
        let show_icon = std::io::stderr().is_terminal() && std::env::var_os("NO_ICONS").is_none();
        if show_icon {
            eprintln!("⚠ {}", format!($($arg)*));
        } else {
            eprintln!("{}", format!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! ui_err {
    ($($arg:tt)*) => {{
        eprintln!("✖ {}", format!($($arg)*));
    }};
}

#[macro_export]
macro_rules! ui_out {
    ($($arg:tt)*) => {{
        println!("{}", format!($($arg)*));
    }};
}
