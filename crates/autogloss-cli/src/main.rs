use anyhow::{Context, Result};
use autogloss_config::Config;
use autogloss_engine::{
    Annotator, AnnotatorConfig, ExcludedTags, PageContext, TermCatalog, io, render_index,
};
use std::{env, path::PathBuf, process};

const USAGE: &str = "<input.html> [catalog.toml] [-o <output.html>] [--post-type <type>]\n       index [catalog.toml] [-o <output.html>]";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Annotate {
        input: PathBuf,
        catalog: Option<PathBuf>,
        output: Option<PathBuf>,
        post_type: Option<String>,
    },
    Index {
        catalog: Option<PathBuf>,
        output: Option<PathBuf>,
    },
}

fn parse_args(args: &[String]) -> Option<Command> {
    let mut positional = Vec::new();
    let mut output = None;
    let mut post_type = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" | "--output" => output = Some(PathBuf::from(iter.next()?)),
            "--post-type" => post_type = Some(iter.next()?.clone()),
            flag if flag.starts_with('-') => return None,
            _ => positional.push(arg.as_str()),
        }
    }

    match positional.as_slice() {
        ["index"] => Some(Command::Index {
            catalog: None,
            output,
        }),
        ["index", catalog] => Some(Command::Index {
            catalog: Some(PathBuf::from(catalog)),
            output,
        }),
        [input] => Some(Command::Annotate {
            input: PathBuf::from(input),
            catalog: None,
            output,
            post_type,
        }),
        [input, catalog] => Some(Command::Annotate {
            input: PathBuf::from(input),
            catalog: Some(PathBuf::from(catalog)),
            output,
            post_type,
        }),
        _ => None,
    }
}

fn annotator_config(config: &Config) -> AnnotatorConfig {
    AnnotatorConfig {
        excluded_tags: ExcludedTags::new(&config.excluded_tags),
        glossary_page_url: config.glossary_page_url.clone(),
        excluded_post_types: config.excluded_post_types.clone(),
        popover_mode: config.popover_mode,
        show_synonyms: config.show_synonyms,
        helper_text: config.helper_text.clone(),
    }
}

fn resolve_catalog(explicit: Option<PathBuf>, config: &Config) -> Result<TermCatalog> {
    let path = explicit
        .or_else(|| config.catalog_path.clone())
        .with_context(|| {
            format!(
                "No catalog given and no catalog_path set in {}",
                Config::config_path().display()
            )
        })?;
    log::info!("Loading catalog from {}", path.display());
    io::load_catalog(&path).with_context(|| format!("Failed to load catalog {}", path.display()))
}

fn emit(html: &str, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            io::write_content(&path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => println!("{html}"),
    }
    Ok(())
}

fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Annotate {
            input,
            catalog,
            output,
            post_type,
        } => {
            let catalog = resolve_catalog(catalog, config)?;
            let content = io::read_content(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;

            let annotator = Annotator::new(annotator_config(config));
            let context = PageContext {
                post_type,
                is_glossary_page: false,
            };
            let result = annotator.annotate_page(&content, &catalog, &context);

            log::info!(
                "Annotated {} with {} term(s), terms_found={}",
                input.display(),
                result.occurrences.len(),
                result.terms_found
            );
            for occurrence in &result.occurrences {
                log::debug!(
                    "{:?} -> term {} ({})",
                    occurrence.matched_text,
                    occurrence.term_id,
                    occurrence.marker_id
                );
            }

            emit(&result.html, output)
        }
        Command::Index { catalog, output } => {
            let catalog = resolve_catalog(catalog, config)?;
            log::info!("Rendering index of {} entries", catalog.len());
            emit(&render_index(&catalog), output)
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(command) = parse_args(args.get(1..).unwrap_or_default()) else {
        eprintln!("Usage: autogloss {USAGE}");
        process::exit(1);
    };

    let config_path = Config::config_path();
    log::info!("Config path: {}", config_path.display());

    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => {
            log::info!("No config file found, using defaults");
            Config::default()
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    run(command, &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autogloss_engine::PopoverMode;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_annotate() {
        let command = parse_args(&args(&["page.html", "terms.toml", "-o", "out.html"]));

        assert_eq!(
            command,
            Some(Command::Annotate {
                input: PathBuf::from("page.html"),
                catalog: Some(PathBuf::from("terms.toml")),
                output: Some(PathBuf::from("out.html")),
                post_type: None,
            })
        );
    }

    #[test]
    fn test_parse_post_type_and_index() {
        let command = parse_args(&args(&["--post-type", "post", "page.html"]));

        assert_eq!(
            command,
            Some(Command::Annotate {
                input: PathBuf::from("page.html"),
                catalog: None,
                output: None,
                post_type: Some("post".into()),
            })
        );
        assert_eq!(
            parse_args(&args(&["index"])),
            Some(Command::Index {
                catalog: None,
                output: None
            })
        );
    }

    #[test]
    fn test_parse_rejects_bad_arguments() {
        assert_eq!(parse_args(&args(&[])), None);
        assert_eq!(parse_args(&args(&["a", "b", "c"])), None);
        assert_eq!(parse_args(&args(&["page.html", "-o"])), None);
        assert_eq!(parse_args(&args(&["--verbose", "page.html"])), None);
    }

    #[test]
    fn test_annotator_config_mapping() {
        let config = Config {
            excluded_tags: vec!["a".into(), "pre".into()],
            popover_mode: PopoverMode::Manual,
            show_synonyms: true,
            ..Config::default()
        };

        let mapped = annotator_config(&config);

        assert_eq!(mapped.excluded_tags, ExcludedTags::new(["a", "pre"]));
        assert_eq!(mapped.popover_mode, PopoverMode::Manual);
        assert!(mapped.show_synonyms);
    }

    #[test]
    fn test_run_annotate_writes_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("page.html");
        let catalog = dir.path().join("terms.toml");
        let output = dir.path().join("out/page.html");
        std::fs::write(&input, "<p>A widget.</p>").unwrap();
        std::fs::write(&catalog, "[[term]]\nid = 1\ntitle = \"Widget\"\n").unwrap();

        run(
            Command::Annotate {
                input,
                catalog: Some(catalog),
                output: Some(output.clone()),
                post_type: None,
            },
            &Config::default(),
        )
        .unwrap();

        let html = std::fs::read_to_string(output).unwrap();
        assert!(html.contains(r#"<dfn id="dfn-"#));
        assert!(html.contains("<aside "));
    }

    #[test]
    fn test_default_config_leaves_scripts_alone() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("page.html");
        let catalog = dir.path().join("terms.toml");
        let output = dir.path().join("page.out.html");
        std::fs::write(&input, "<script>var widget = 1;</script><p>widget</p>").unwrap();
        std::fs::write(&catalog, "[[term]]\nid = 1\ntitle = \"widget\"\n").unwrap();

        run(
            Command::Annotate {
                input,
                catalog: Some(catalog),
                output: Some(output.clone()),
                post_type: None,
            },
            &Config::default(),
        )
        .unwrap();

        let html = std::fs::read_to_string(output).unwrap();
        assert!(html.starts_with("<script>var widget = 1;</script><p><dfn "));
    }

    #[test]
    fn test_run_without_catalog_fails() {
        let result = run(
            Command::Index {
                catalog: None,
                output: None,
            },
            &Config::default(),
        );

        assert!(result.is_err());
    }
}
