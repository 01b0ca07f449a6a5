use colored::*;

pub fn show() {
    let banner = r#"
    ██╗  ██╗██████╗  █████╗ ██╗   ██╗      ██████╗ ███████╗
    ╚██╗██╔╝██╔══██╗██╔══██╗╚██╗ ██╔╝      ██╔══██╗██╔════╝
     ╚███╔╝ ██████╔╝███████║ ╚████╔╝ █████╗██████╔╝███████╗
     ██╔██╗ ██╔══██╗██╔══██║  ╚██╔╝  ╚════╝██╔══██╗╚════██║
    ██╔╝ ██╗██║  ██║██║  ██║   ██║         ██║  ██║███████║
    ╚═╝  ╚═╝╚═╝  ╚═╝╚═╝  ╚═╝   ╚═╝         ╚═╝  ╚═╝╚══════╝
    "#;

    println!("{}", banner.bright_cyan());
    println!("    {}", "Run the xray community scanner and collect its findings".bright_yellow());
    println!("    {}", format!("Version: {}", env!("CARGO_PKG_VERSION")).bright_yellow());
    println!();
}
