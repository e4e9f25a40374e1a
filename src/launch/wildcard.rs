//! Shell-style wildcard expansion for command arguments.
//!
//! Only `*` (any run of characters) and `?` (one character) are special, and
//! they never match `/` or a leading `.`. Each path component is matched
//! against the directory listing one level at a time. A pattern that matches
//! nothing is passed through literally, as POSIX shells do. A trailing `/`
//! keeps only directories. Entries whose names are not UTF-8 are skipped
//! with a warning.
//!
//! Example, with `dist/` holding two artifacts:
//! `dist/*`  =>  `dist/pkg-0.1.0-py3-none-any.whl`, `dist/pkg-0.1.0.tar.gz`

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Expand every wildcard argument relative to `working_dir`.
pub fn expand_args(args: &[String], working_dir: &Path) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        if !has_wildcard(arg) {
            out.push(arg.clone());
            continue;
        }
        let matches = expand_pattern(arg, working_dir);
        if matches.is_empty() {
            out.push(arg.clone());
        } else {
            out.extend(matches);
        }
    }
    out
}

fn has_wildcard(s: &str) -> bool {
    s.contains(['*', '?'])
}

/// A partially expanded path: text passed to the program + where it lives.
struct Candidate {
    text: String,
    path: PathBuf,
}

fn expand_pattern(pattern: &str, working_dir: &Path) -> Vec<String> {
    let root = if pattern.starts_with('/') {
        Candidate {
            text: "/".to_string(),
            path: PathBuf::from("/"),
        }
    } else {
        Candidate {
            text: String::new(),
            path: working_dir.to_path_buf(),
        }
    };

    let mut candidates = vec![root];
    for component in pattern.split('/').filter(|c| !c.is_empty()) {
        let mut next = Vec::new();
        if has_wildcard(component) {
            let Some(re) = component_regex(component) else {
                return Vec::new();
            };
            for cand in &candidates {
                for name in matching_entries(&cand.path, component, &re) {
                    next.push(Candidate {
                        text: join_text(&cand.text, &name),
                        path: cand.path.join(&name),
                    });
                }
            }
        } else {
            for cand in candidates {
                next.push(Candidate {
                    text: join_text(&cand.text, component),
                    path: cand.path.join(component),
                });
            }
        }
        candidates = next;
        if candidates.is_empty() {
            break;
        }
    }

    let dirs_only = pattern.ends_with('/');
    let mut out: Vec<String> = candidates
        .into_iter()
        .filter(|c| {
            if dirs_only {
                c.path.is_dir()
            } else {
                fs::symlink_metadata(&c.path).is_ok()
            }
        })
        .map(|c| c.text)
        .collect();
    if dirs_only {
        for text in &mut out {
            text.push('/');
        }
    }
    out.sort();
    out
}

/// Sorted directory entries of `dir` whose names match `re`.
fn matching_entries(dir: &Path, component: &str, re: &Regex) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| match entry.file_name().into_string() {
            Ok(name) => Some(name),
            Err(raw) => {
                warn!(dir = %dir.display(), name = ?raw, "skipping non-UTF-8 file name in wildcard match");
                None
            }
        })
        .filter(|name| !name.starts_with('.') || component.starts_with('.'))
        .filter(|name| re.is_match(name))
        .collect();
    names.sort();
    names
}

fn component_regex(component: &str) -> Option<Regex> {
    let mut re = String::from("^");
    for ch in component.chars() {
        match ch {
            '*' => re.push_str("[^/]*"),
            '?' => re.push_str("[^/]"),
            c => re.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    re.push('$');
    Regex::new(&re).ok()
}

fn join_text(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else if prefix.ends_with('/') {
        format!("{}{}", prefix, name)
    } else {
        format!("{}/{}", prefix, name)
    }
}
