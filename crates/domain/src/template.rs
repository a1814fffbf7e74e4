use crate::notification::NotificationCode;
use std::collections::HashMap;
use tracing::warn;

/// Placeholder token replaced with the tenant's first name when rendering
pub const NAME_PLACEHOLDER: &str = "{{name}}";

/// What happens when a template table defines the same code twice across
/// its two column-pairs. The tables are hand-maintained, so this is an
/// explicit configuration choice instead of an accident of load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateCodePolicy {
    FirstWins,
    LastWins,
}

/// The property category a tenant's address resolves to. Exactly one
/// template group applies per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Madrid,
    Casita43,
    Hoyo2,
    Rrhh,
    LongStay,
}

impl PropertyKind {
    /// Classifies an address string. Matching is done on the uppercased
    /// address with all whitespace removed, and rule order is significant:
    /// RRHH, then the `-LE` long-stay suffix, then the property tokens,
    /// then the Madrid default.
    pub fn classify(address: &str) -> PropertyKind {
        let addr: String = address
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();
        if addr.contains("RRHH") {
            return PropertyKind::Rrhh;
        }
        if addr.ends_with("-LE") {
            return PropertyKind::LongStay;
        }
        if addr.contains("CASITA43") {
            return PropertyKind::Casita43;
        }
        if addr.contains("HOYO2") {
            return PropertyKind::Hoyo2;
        }
        PropertyKind::Madrid
    }
}

/// Mapping from notification code to message template for one property
/// category. Keys are stored trimmed and uppercased so lookups are
/// case- and whitespace-insensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateGroup {
    templates: HashMap<String, String>,
}

impl TemplateGroup {
    /// Builds a group from raw table rows. A header row (first row with a
    /// cell containing "code" or "message", case-insensitive) is skipped;
    /// otherwise every row is data. Each row may contribute two pairs, one
    /// from columns A/B and one from columns C/D; blank codes are ignored.
    pub fn from_rows(rows: Vec<Vec<String>>, policy: DuplicateCodePolicy) -> Self {
        let mut group = TemplateGroup::default();
        let start = match rows.first() {
            Some(row) if is_header_row(row) => 1,
            _ => 0,
        };
        for row in rows.iter().skip(start) {
            group.insert_pair(row.get(0), row.get(1), policy);
            group.insert_pair(row.get(2), row.get(3), policy);
        }
        group
    }

    fn insert_pair(
        &mut self,
        code: Option<&String>,
        message: Option<&String>,
        policy: DuplicateCodePolicy,
    ) {
        let code = match code {
            Some(code) => normalize_code(code),
            None => return,
        };
        if code.is_empty() {
            return;
        }
        if code.parse::<NotificationCode>().is_err() {
            warn!("Template key {:?} is not a well-formed notification code", code);
        }
        let message = message.cloned().unwrap_or_default();
        match policy {
            DuplicateCodePolicy::FirstWins => {
                self.templates.entry(code).or_insert(message);
            }
            DuplicateCodePolicy::LastWins => {
                self.templates.insert(code, message);
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.templates.get(&normalize_code(code)).map(String::as_str)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.templates.contains_key(&normalize_code(code))
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// The `E-NN` countdown offsets present in this group with NN in 1..=30,
    /// descending. `E-00` is never part of a catch-up sweep.
    pub fn countdown_offsets(&self) -> Vec<i64> {
        let mut offsets: Vec<i64> = self
            .templates
            .keys()
            .filter_map(|key| key.parse::<NotificationCode>().ok())
            .filter_map(|code| match code {
                NotificationCode::BeforeEntry(n) if n >= 1 => Some(n),
                _ => None,
            })
            .collect();
        offsets.sort_unstable_by(|a, b| b.cmp(a));
        offsets
    }
}

/// All template groups, loaded as one consistent snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateSet {
    pub madrid: TemplateGroup,
    pub casita43: TemplateGroup,
    pub hoyo2: TemplateGroup,
    pub rrhh: TemplateGroup,
    pub long_stay: TemplateGroup,
}

impl TemplateSet {
    pub fn group(&self, kind: PropertyKind) -> &TemplateGroup {
        match kind {
            PropertyKind::Madrid => &self.madrid,
            PropertyKind::Casita43 => &self.casita43,
            PropertyKind::Hoyo2 => &self.hoyo2,
            PropertyKind::Rrhh => &self.rrhh,
            PropertyKind::LongStay => &self.long_stay,
        }
    }

    pub fn group_for(&self, address: &str) -> &TemplateGroup {
        self.group(PropertyKind::classify(address))
    }
}

/// Replaces every name placeholder with the tenant's first name token.
pub fn render(template: &str, name: &str) -> String {
    template.replace(NAME_PLACEHOLDER, first_name(name))
}

fn first_name(full: &str) -> &str {
    full.split_whitespace().next().unwrap_or("")
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

fn is_header_row(row: &[String]) -> bool {
    row.iter().take(4).any(|cell| {
        let cell = cell.trim().to_lowercase();
        cell.contains("code") || cell.contains("message")
    })
}
