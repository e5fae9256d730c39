use colored::*;
use unicode_width::UnicodeWidthStr;

use reactorctl_common::device::Device;

pub const TOTAL_WIDTH: usize = 64;

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_width: usize = UnicodeWidthStr::width(formatted.as_str());

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_width);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    println!(
        "{}{}{}",
        "─".repeat(left).bright_black(),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right).bright_black()
    );
}

pub fn status(msg: &str) {
    println!("{} {}", ">".bright_black(), msg);
}

pub fn separator() {
    println!("{}", "═".repeat(TOTAL_WIDTH).bright_black());
}

pub fn centerln(msg: &str) {
    let width: usize = console::measure_text_width(msg);
    let pad: usize = TOTAL_WIDTH.saturating_sub(width) / 2;
    println!("{}{}", " ".repeat(pad), msg);
}

pub fn device_line(idx: usize, device: &Device) {
    let idx_str: String = format!("[{idx}]");
    println!(
        "{} {} {}",
        idx_str.bright_black(),
        device.hostname.bright_cyan(),
        format!("{}:{}", device.address, device.port).bright_black()
    );
}
