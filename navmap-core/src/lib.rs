pub mod config;
pub mod report;
pub mod scrape;

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
                                          
  _ __   __ ___   ___ __ ___   __ _ _ __  
 | '_ \ / _` \ \ / / '_ ` _ \ / _` | '_ \ 
 | | | | (_| |\ V /| | | | | | (_| | |_) |
 |_| |_|\__,_| \_/ |_| |_| |_|\__,_| .__/ 
                                   |_|    
"#;
    println!("{}", banner.bright_cyan());
    println!(
        "  {} {}\n",
        "site navigation menu extractor".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
