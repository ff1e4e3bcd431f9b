use chrono::TimeZone;
use chrono_tz::{America::New_York, Asia::Tokyo, Europe::London, Tz, US::Pacific, UTC};
use recur_expr::parse_cron;

fn main() {
    let cron_expr = "0 9 * * 1-5"; // Every weekday at 9:00 AM

    println!("Cron expression: {cron_expr} (Every weekday at 9:00 AM)");
    println!();

    let utc_now = UTC.from_utc_datetime(&chrono::Utc::now().naive_utc());
    println!(
        "Current UTC time: {}",
        utc_now.format("%Y-%m-%d %H:%M:%S %Z")
    );
    println!();

    println!("Next execution time in different timezones:");
    println!("--------------------------------------------------------");

    print_next("UTC", cron_expr, utc_now);
    print_next("US/Pacific", cron_expr, utc_now.with_timezone(&Pacific));
    print_next("America/New_York", cron_expr, utc_now.with_timezone(&New_York));
    print_next("Europe/London", cron_expr, utc_now.with_timezone(&London));
    print_next("Asia/Tokyo", cron_expr, utc_now.with_timezone(&Tokyo));

    println!();
    println!("Note: the same cron expression produces different absolute times");
    println!("depending on the timezone, but represents the same local time.");
}

fn print_next(label: &str, cron_expr: &str, now: chrono::DateTime<Tz>) {
    let expr = match parse_cron(cron_expr) {
        Ok(expr) => expr,
        Err(e) => {
            println!("{label:<16} Error: {e}");
            return;
        }
    };
    match expr.next(now) {
        Some(next) => println!("{label:<16} {}", next.format("%Y-%m-%d %H:%M:%S %Z")),
        None => println!("{label:<16} none"),
    }
}
