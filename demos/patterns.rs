use chrono::TimeZone;
use chrono_tz::UTC;
use recur_expr::{parse_cron, parse_systemd};

fn main() {
    let title = "Common Recurring-Time Expression Patterns";
    println!("{title}");
    println!("{}", "-".repeat(title.len()));
    println!();

    let now = UTC.from_utc_datetime(&chrono::Utc::now().naive_utc());
    println!("Current time: {}", now.format("%Y-%m-%d %H:%M:%S %Z"));
    println!();

    println!("Cron:");
    let cron_patterns = vec![
        ("* * * * *", "Every minute"),
        ("*/5 * * * *", "Every 5 minutes"),
        ("0 */2 * * *", "Every 2 hours"),
        ("0 0 * * *", "Daily at midnight"),
        ("0 9 * * 1-5", "Weekdays at 9:00 AM"),
        ("0 0 1 * *", "Monthly on the 1st at midnight"),
        ("0 0 1 1 *", "Yearly on January 1st at midnight"),
        ("0 0 LW * *", "Last weekday of the month"),
        ("0 0 * * 6#5", "The fifth Saturday of the month, when it exists"),
        ("@weekly", "Shortcut: weekly on Sunday at midnight"),
    ];
    for (pattern, description) in cron_patterns {
        print_cron_pattern(&now, pattern, description);
    }

    println!();
    println!("Systemd calendar:");
    let systemd_patterns = vec![
        ("daily", "Shortcut: every day at midnight"),
        ("Mon..Fri 09:00:00", "Weekdays at 9:00 AM"),
        ("*-*-01 00:00:00", "Monthly on the 1st at midnight"),
        ("*-02-29 01:00:00", "Every leap-year Feb 29 at 01:00"),
        ("weekly Pacific/Auckland", "Weekly, evaluated in Auckland"),
    ];
    for (pattern, description) in systemd_patterns {
        print_systemd_pattern(&now, pattern, description);
    }
}

fn print_cron_pattern(now: &chrono::DateTime<chrono_tz::Tz>, pattern: &str, description: &str) {
    match parse_cron(pattern) {
        Ok(expr) => match expr.next(*now) {
            Some(next) => {
                println!("{description:<55} {pattern}");
                println!("  Next: {}", next.format("%Y-%m-%d %H:%M:%S %Z"));
            }
            None => println!("{description:<55} {pattern}\n  Next: none"),
        },
        Err(e) => println!("{description:<55} {pattern}\n  Error: {e}"),
    }
    println!();
}

fn print_systemd_pattern(now: &chrono::DateTime<chrono_tz::Tz>, pattern: &str, description: &str) {
    match parse_systemd(pattern) {
        Ok(expr) => match expr.next(*now) {
            Some(next) => {
                println!("{description:<55} {pattern}");
                println!("  Next: {}", next.format("%Y-%m-%d %H:%M:%S %Z"));
            }
            None => println!("{description:<55} {pattern}\n  Next: none"),
        },
        Err(e) => println!("{description:<55} {pattern}\n  Error: {e}"),
    }
    println!();
}
