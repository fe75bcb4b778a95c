use autogloss_engine::{TermCatalog, TermRecord};

// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_catalog(size: usize) -> TermCatalog {
    let records = (0..size)
        .map(|i| {
            TermRecord::new(i.to_string(), format!("term{i}"))
                .with_synonyms([format!("synonym {i}"), format!("alias{i} phrase")])
                .with_short_description(format!("Definition number {i}."))
        })
        .collect();
    TermCatalog::new(records).expect("generated catalog is valid")
}

#[allow(dead_code)]
pub fn generate_article(sections: usize) -> String {
    let mut content = String::new();

    for section in 0..sections {
        content.push_str(&format!("<h2>Section term{section}</h2>\n"));
        content.push_str(&format!(
            "<p>Paragraph mentioning term{section}, synonym {} and a <a href=\"/x\">link to term{section}</a>.</p>\n",
            section * 2
        ));
        content.push_str(&format!(
            "<p class=\"term{section}\">Repeated term{section} with alias{section} phrase.</p>\n"
        ));
    }

    content
}
