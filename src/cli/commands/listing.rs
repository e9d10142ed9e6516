//! Site and country listings

use crate::config::Config;
use crate::models::{Country, Site};

pub fn cmd_sites(config: &Config) {
    println!("Supported job sites ({} total)", Site::ALL.len());
    println!("{:-<50}", "");

    for site in Site::ALL {
        let marker = if config.search.sites.contains(&site) {
            "✓"
        } else {
            " "
        };
        let note = if site == Site::ZipRecruiter {
            "  (USA and Canada only)"
        } else {
            ""
        };
        println!("{} {:<14} {}{}", marker, site.as_str(), site.label(), note);
    }

    println!();
    println!("✓ = selected by default in the web UI");
}

pub fn cmd_countries() {
    let countries = Country::all();
    println!("Supported countries ({} total)", countries.len());
    println!("{:-<50}", "");

    for country in countries {
        let note = if country.supports_zip_recruiter() {
            "  (ZipRecruiter available)"
        } else {
            ""
        };
        println!("{}{}", country.display_name(), note);
    }
}
