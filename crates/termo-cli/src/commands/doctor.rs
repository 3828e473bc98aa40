//! Doctor command - check the OCR tools and language data.

use console::style;

use termo_core::ocr::tools;

use super::load_config;

pub async fn run(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let ocr = &config.ocr;
    let mut healthy = true;

    match tools::check_pdftoppm(&ocr.pdftoppm_path) {
        Ok(version) => println!("{} pdftoppm: {}", style("✓").green(), version),
        Err(e) => {
            println!("{} pdftoppm: {}", style("✗").red(), e);
            healthy = false;
        }
    }

    match tools::check_tesseract(&ocr.tesseract_path) {
        Ok(version) => {
            println!("{} tesseract: {}", style("✓").green(), version);

            let languages = tools::tesseract_languages(&ocr.tesseract_path)?;
            if languages.iter().any(|l| l == &ocr.language) {
                println!("{} language '{}' installed", style("✓").green(), ocr.language);
            } else {
                println!(
                    "{} language '{}' not installed (available: {})",
                    style("✗").red(),
                    ocr.language,
                    languages.join(", ")
                );
                healthy = false;
            }
        }
        Err(e) => {
            println!("{} tesseract: {}", style("✗").red(), e);
            healthy = false;
        }
    }

    if !healthy {
        if !ocr.enabled {
            println!(
                "{} OCR is disabled in the configuration; only embedded text will be read.",
                style("ℹ").blue()
            );
            return Ok(());
        }
        anyhow::bail!("OCR tools are not ready");
    }

    println!();
    println!("{} OCR fallback ready", style("✓").green());
    Ok(())
}
