//! 输出解析函数

use super::types::DetailInfo;
use serde::Deserialize;

/// 清理终端输出中的 ANSI 转义序列和特殊字符
pub fn clean_terminal_output(input: &str) -> String {
    let mut result = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\x1b' => {
                if chars.peek() == Some(&'[') {
                    chars.next();
                    while let Some(&next) = chars.peek() {
                        chars.next();
                        if next.is_ascii_alphabetic() {
                            break;
                        }
                    }
                }
            }
            '\r' => {
                if chars.peek() != Some(&'\n') && !result.ends_with('\n') {
                    result.push('\n');
                }
            }
            c if c.is_control() && c != '\n' && c != '\t' => {}
            _ => result.push(c),
        }
    }

    // 合并连续空行
    let mut cleaned_lines = Vec::new();
    let mut prev_empty = false;
    for line in result.lines() {
        let is_empty = line.trim().is_empty();
        if is_empty && prev_empty {
            continue;
        }
        cleaned_lines.push(line);
        prev_empty = is_empty;
    }

    cleaned_lines.join("\n")
}

/// 解析 `brew list --formula --versions`
///
/// 每行 `name v1 [v2 ...]`，同一 formula 装有多个版本时取最后一个。
pub fn parse_versions_output(output: &str) -> Vec<(String, String)> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let name = parts.next()?;
            let version = parts.last().unwrap_or("");
            Some((name.to_string(), version.to_string()))
        })
        .collect()
}

/// 解析 `brew outdated --formula --verbose`
///
/// 典型行：
///   `wget (1.21.3) < 1.21.4`
///   `python@3.12 (3.12.1, 3.12.2) < 3.12.3`
///   `node (20.1.0) != 21.0.0`
pub fn parse_outdated_output(output: &str) -> Vec<(String, String, String)> {
    let mut results = Vec::new();

    for line in output.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let Some(open) = trimmed.find('(') else {
            // 非 verbose 格式只有名字，没有版本信息
            if !trimmed.contains(' ') {
                results.push((trimmed.to_string(), String::new(), String::new()));
            }
            continue;
        };
        let Some(close) = trimmed[open..].find(')').map(|i| open + i) else {
            continue;
        };

        let name = trimmed[..open].trim();
        if name.is_empty() {
            continue;
        }
        let installed = trimmed[open + 1..close]
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .last()
            .unwrap_or("");

        let rest = trimmed[close + 1..].trim();
        let latest = rest
            .strip_prefix("!=")
            .or_else(|| rest.strip_prefix('<'))
            .unwrap_or(rest)
            .split_whitespace()
            .next()
            .unwrap_or("");

        results.push((name.to_string(), installed.to_string(), latest.to_string()));
    }

    results
}

#[derive(Debug, Deserialize)]
struct BrewInfoJson {
    desc: Option<String>,
    homepage: Option<String>,
    dependencies: Option<Vec<String>>,
    conflicts_with: Option<Vec<String>>,
}

/// 解析 `brew info --json=v1 <name>`，取数组第一个元素
pub fn parse_info_json(output: &str) -> Result<DetailInfo, String> {
    let entries: Vec<BrewInfoJson> =
        serde_json::from_str(output).map_err(|e| e.to_string())?;
    let first = entries
        .into_iter()
        .next()
        .ok_or_else(|| "返回结果为空".to_string())?;

    Ok(DetailInfo {
        desc: first.desc,
        homepage: first.homepage,
        dependencies: first.dependencies,
        conflicts_with: first.conflicts_with,
    })
}
