use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorAttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
    StartsWith { key: String, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    pub(crate) tag: Option<String>,
    pub(crate) universal: bool,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<SelectorAttrCondition>,
}

impl SelectorStep {
    pub(crate) fn id_only(&self) -> Option<&str> {
        if !self.universal && self.tag.is_none() && self.classes.is_empty() && self.attrs.is_empty()
        {
            self.id.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectorCombinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorPart {
    pub(crate) step: SelectorStep,
    // Relation to previous (left) selector part.
    pub(crate) combinator: Option<SelectorCombinator>,
}

pub(crate) fn parse_selector_groups(selector: &str) -> Result<Vec<Vec<SelectorPart>>> {
    let groups = split_selector_groups(selector)?;
    let mut parsed = Vec::with_capacity(groups.len());
    for group in groups {
        parsed.push(parse_selector_chain(&group)?);
    }
    Ok(parsed)
}

fn split_selector_groups(selector: &str) -> Result<Vec<String>> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0usize;
    let mut quote: Option<char> = None;

    for ch in selector.chars() {
        if let Some(open) = quote {
            if ch == open {
                quote = None;
            }
            current.push(ch);
            continue;
        }
        match ch {
            '"' | '\'' if bracket_depth > 0 => {
                quote = Some(ch);
                current.push(ch);
            }
            '[' => {
                bracket_depth += 1;
                current.push(ch);
            }
            ']' => {
                if bracket_depth == 0 {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                bracket_depth -= 1;
                current.push(ch);
            }
            ',' if bracket_depth == 0 => {
                let trimmed = current.trim();
                if trimmed.is_empty() {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                groups.push(trimmed.to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if bracket_depth != 0 || quote.is_some() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    let trimmed = current.trim();
    if trimmed.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    groups.push(trimmed.to_string());
    Ok(groups)
}

fn parse_selector_chain(selector: &str) -> Result<Vec<SelectorPart>> {
    let tokens = tokenize_selector(selector)?;
    let mut parts: Vec<SelectorPart> = Vec::new();
    let mut pending_combinator: Option<SelectorCombinator> = None;

    for token in tokens {
        if token == ">" {
            if pending_combinator.is_some() || parts.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            pending_combinator = Some(SelectorCombinator::Child);
            continue;
        }

        let step = parse_selector_step(&token)?;
        let combinator = if parts.is_empty() {
            None
        } else {
            Some(
                pending_combinator
                    .take()
                    .unwrap_or(SelectorCombinator::Descendant),
            )
        };
        parts.push(SelectorPart { step, combinator });
    }

    if pending_combinator.is_some() || parts.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    Ok(parts)
}

fn tokenize_selector(selector: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0usize;

    for ch in selector.chars() {
        match ch {
            '[' => {
                bracket_depth += 1;
                current.push(ch);
            }
            ']' => {
                if bracket_depth == 0 {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                bracket_depth -= 1;
                current.push(ch);
            }
            '+' | '~' if bracket_depth == 0 => {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            '>' if bracket_depth == 0 => {
                if !current.trim().is_empty() {
                    tokens.push(current.trim().to_string());
                }
                current.clear();
                tokens.push(ch.to_string());
            }
            ch if ch.is_ascii_whitespace() && bracket_depth == 0 => {
                if !current.trim().is_empty() {
                    tokens.push(current.trim().to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if bracket_depth != 0 {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    if !current.trim().is_empty() {
        tokens.push(current.trim().to_string());
    }
    Ok(tokens)
}

fn parse_selector_step(part: &str) -> Result<SelectorStep> {
    let bytes = part.as_bytes();
    let mut i = 0usize;
    let mut step = SelectorStep::default();

    while i < bytes.len() {
        match bytes[i] {
            b'*' => {
                if step.universal || step.tag.is_some() {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                step.universal = true;
                i += 1;
            }
            b'#' => {
                let Some((id, next)) = parse_selector_ident(part, i + 1) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                if step.id.replace(id).is_some() {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                i = next;
            }
            b'.' => {
                let Some((class_name, next)) = parse_selector_ident(part, i + 1) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                step.classes.push(class_name);
                i = next;
            }
            b'[' => {
                let (attr, next) = parse_selector_attr_condition(part, i)?;
                step.attrs.push(attr);
                i = next;
            }
            _ => {
                if step.tag.is_some()
                    || step.universal
                    || step.id.is_some()
                    || !step.classes.is_empty()
                    || !step.attrs.is_empty()
                {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                let Some((tag, next)) = parse_selector_ident(part, i) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                step.tag = Some(tag.to_ascii_lowercase());
                i = next;
            }
        }
    }

    if step.tag.is_none()
        && step.id.is_none()
        && step.classes.is_empty()
        && step.attrs.is_empty()
        && !step.universal
    {
        return Err(Error::UnsupportedSelector(part.into()));
    }
    Ok(step)
}

fn parse_selector_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    let mut i = start;
    while i < bytes.len() && is_ident_byte(bytes[i]) {
        i += 1;
    }
    if i == start {
        return None;
    }
    Some((src.get(start..i)?.to_string(), i))
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b >= 0x80
}

fn parse_selector_attr_condition(src: &str, start: usize) -> Result<(SelectorAttrCondition, usize)> {
    let unsupported = || Error::UnsupportedSelector(src.into());
    let bytes = src.as_bytes();
    let mut i = start + 1;

    let (key, next) = parse_selector_ident(src, i).ok_or_else(unsupported)?;
    let key = key.to_ascii_lowercase();
    i = next;

    let starts_with = match bytes.get(i) {
        Some(b']') => return Ok((SelectorAttrCondition::Exists { key }, i + 1)),
        Some(b'=') => {
            i += 1;
            false
        }
        Some(b'^') if bytes.get(i + 1) == Some(&b'=') => {
            i += 2;
            true
        }
        _ => return Err(unsupported()),
    };

    let value = match bytes.get(i) {
        Some(&quote @ (b'"' | b'\'')) => {
            let value_start = i + 1;
            let close = bytes[value_start..]
                .iter()
                .position(|b| *b == quote)
                .map(|offset| value_start + offset)
                .ok_or_else(unsupported)?;
            i = close + 1;
            src.get(value_start..close).ok_or_else(unsupported)?.to_string()
        }
        _ => {
            let (value, next) = parse_selector_ident(src, i).ok_or_else(unsupported)?;
            i = next;
            value
        }
    };

    if bytes.get(i) != Some(&b']') {
        return Err(unsupported());
    }

    let condition = if starts_with {
        SelectorAttrCondition::StartsWith { key, value }
    } else {
        SelectorAttrCondition::Eq { key, value }
    };
    Ok((condition, i + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_split_on_top_level_commas_only() -> Result<()> {
        let groups = parse_selector_groups(".a, .b > p, a[href^=\"#,x\"]")?;
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[1].len(), 2);
        assert_eq!(groups[1][1].combinator, Some(SelectorCombinator::Child));
        assert_eq!(
            groups[2][0].step.attrs,
            vec![SelectorAttrCondition::StartsWith {
                key: "href".into(),
                value: "#,x".into(),
            }]
        );
        Ok(())
    }

    #[test]
    fn compound_step_collects_classes_and_id() -> Result<()> {
        let groups = parse_selector_groups("div#hero.btm-card.wide")?;
        let step = &groups[0][0].step;
        assert_eq!(step.tag.as_deref(), Some("div"));
        assert_eq!(step.id.as_deref(), Some("hero"));
        assert_eq!(step.classes, vec!["btm-card".to_string(), "wide".to_string()]);
        assert_eq!(step.id_only(), None);
        Ok(())
    }

    #[test]
    fn rejects_sibling_combinators_and_dangling_parts() {
        for selector in ["a + b", "a ~ b", "a >", ", a", "[href", ".", ""] {
            assert!(
                matches!(
                    parse_selector_groups(selector),
                    Err(Error::UnsupportedSelector(_))
                ),
                "{selector} should be rejected"
            );
        }
    }

    #[test]
    fn attribute_equality_accepts_bare_values() -> Result<()> {
        let groups = parse_selector_groups("[data-kind=stat]")?;
        assert_eq!(
            groups[0][0].step.attrs,
            vec![SelectorAttrCondition::Eq {
                key: "data-kind".into(),
                value: "stat".into(),
            }]
        );
        Ok(())
    }
}
