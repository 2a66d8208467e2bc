//! Label text: `$...$` math markup and title wrapping.

fn superscript(c: char) -> Option<char> {
    Some(match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        '+' => '⁺',
        '-' | '−' => '⁻',
        '=' => '⁼',
        '(' => '⁽',
        ')' => '⁾',
        'n' => 'ⁿ',
        'i' => 'ⁱ',
        _ => return None,
    })
}

fn subscript(c: char) -> Option<char> {
    Some(match c {
        '0' => '₀',
        '1' => '₁',
        '2' => '₂',
        '3' => '₃',
        '4' => '₄',
        '5' => '₅',
        '6' => '₆',
        '7' => '₇',
        '8' => '₈',
        '9' => '₉',
        '+' => '₊',
        '-' | '−' => '₋',
        '=' => '₌',
        '(' => '₍',
        ')' => '₎',
        'a' => 'ₐ',
        'e' => 'ₑ',
        'h' => 'ₕ',
        'k' => 'ₖ',
        'l' => 'ₗ',
        'm' => 'ₘ',
        'n' => 'ₙ',
        'o' => 'ₒ',
        'p' => 'ₚ',
        's' => 'ₛ',
        't' => 'ₜ',
        'x' => 'ₓ',
        _ => return None,
    })
}

fn command(name: &str) -> Option<&'static str> {
    Some(match name {
        "alpha" => "α",
        "beta" => "β",
        "gamma" => "γ",
        "delta" => "δ",
        "Delta" => "Δ",
        "epsilon" => "ε",
        "lambda" => "λ",
        "mu" => "μ",
        "pi" => "π",
        "sigma" => "σ",
        "tau" => "τ",
        "omega" => "ω",
        "pm" => "±",
        "times" => "×",
        "cdot" => "·",
        "approx" => "≈",
        "AA" => "Å",
        "circ" => "°",
        _ => return None,
    })
}

/// Render a math segment (the text between two `$`).
fn render_math(math: &str) -> String {
    let mut out = String::new();
    let mut chars = math.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '^' | '_' => {
                let group: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    let mut depth = 1;
                    let mut group = String::new();
                    for g in chars.by_ref() {
                        match g {
                            '{' => depth += 1,
                            '}' => {
                                depth -= 1;
                                if depth == 0 {
                                    break;
                                }
                            }
                            _ => group.push(g),
                        }
                    }
                    group
                } else {
                    chars.next().map(String::from).unwrap_or_default()
                };
                let map = if c == '^' { superscript } else { subscript };
                out.extend(render_math(&group).chars().map(|g| map(g).unwrap_or(g)));
            }
            '\\' => {
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if !n.is_ascii_alphabetic() {
                        break;
                    }
                    name.push(n);
                    chars.next();
                }
                if name.is_empty() {
                    // Escaped symbol such as `\%` or `\,`.
                    if let Some(sym) = chars.next() {
                        if sym != ',' && sym != ' ' {
                            out.push(sym);
                        }
                    }
                } else {
                    match command(&name) {
                        Some(symbol) => out.push_str(symbol),
                        None => out.push_str(&name),
                    }
                }
            }
            '{' | '}' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Convert `$...$` markup to plain Unicode: `$BeH_{2}$` → `BeH₂`.
///
/// Text outside dollar signs is kept verbatim. Unbalanced dollar signs
/// leave the string untouched.
pub fn tex_to_unicode(text: &str) -> String {
    if text.matches('$').count() % 2 != 0 {
        return text.to_string();
    }
    text.split('$')
        .enumerate()
        .map(|(i, part)| {
            if i % 2 == 1 {
                render_math(part)
            } else {
                part.to_string()
            }
        })
        .collect()
}

/// Label text as shown on a chart.
pub fn display_label(text: &str, usetex: bool) -> String {
    if usetex {
        tex_to_unicode(text)
    } else {
        text.to_string()
    }
}

/// Greedy word wrap at `width` characters. Words longer than a line are
/// broken.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        if line_len > 0 && line_len + 1 + word.len() <= width {
            line.push(' ');
            line.extend(word.iter());
            line_len += 1 + word.len();
            continue;
        }
        if line_len > 0 {
            lines.push(std::mem::take(&mut line));
        }
        while word.len() > width {
            let rest = word.split_off(width);
            lines.push(word.iter().collect());
            word = rest;
        }
        line.extend(word.iter());
        line_len = word.len();
    }
    if line_len > 0 {
        lines.push(line);
    }
    lines
}
