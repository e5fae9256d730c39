use colored::*;

use reactorctl_core::executor::OperationResult;

use super::print;

/// Prints one line (or block) per device plus the aggregate summary and
/// returns the number of failed devices.
pub fn report(results: &[OperationResult]) -> usize {
    for result in results {
        print_result(result);
    }

    let failed: usize = results.iter().filter(|r| !r.success).count();
    let succeeded: usize = results.len() - failed;

    print::separator();
    let ok_part: ColoredString = format!("{succeeded} succeeded").green().bold();
    let failed_part: ColoredString = if failed > 0 {
        format!("{failed} failed").red().bold()
    } else {
        format!("{failed} failed").bright_black()
    };
    print::centerln(&format!("{ok_part}, {failed_part}"));

    failed
}

fn print_result(result: &OperationResult) {
    let mark: ColoredString = if result.success {
        "[+]".green().bold()
    } else {
        "[-]".red().bold()
    };
    let name: ColoredString = result.device.to_string().bright_cyan();

    if result.message.is_empty() {
        println!("{mark} {name}");
    } else if result.message.contains('\n') {
        // Multi-line remote output reads better as an indented block.
        println!("{mark} {name}:");
        for line in result.message.lines() {
            println!("    {line}");
        }
    } else {
        println!("{mark} {name}: {}", result.message);
    }
}
