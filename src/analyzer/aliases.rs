//! Table alias resolution
//!
//! Maps aliases written in FROM and JOIN clauses (`orders o`,
//! `customers AS c`) back to table names so qualified columns can be
//! attributed to real tables.

use std::collections::HashMap;

use super::join::extract_join_targets;

/// Words that can follow a table name without being an alias.
const NON_ALIAS_KEYWORDS: [&str; 16] = [
    "on", "join", "inner", "left", "right", "full", "outer", "cross", "natural", "where",
    "group", "order", "limit", "having", "using", "union",
];

/// Alias to table name mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
    aliases: HashMap<String, String>,
}

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the map from a FROM fragment and the JOIN targets of `sql`.
    ///
    /// Both inputs are expected to be lower-cased already.
    pub fn from_clauses(from_fragment: Option<&str>, sql: &str) -> Self {
        let mut map = Self::new();

        if let Some(fragment) = from_fragment {
            for entry in fragment.split(',') {
                map.add_table_entry(entry);
            }
        }

        for (table, alias) in extract_join_targets(sql) {
            match alias {
                Some(alias) if !is_keyword(&alias) => map.add_alias(alias, table),
                _ => map.add_alias(table.clone(), table),
            }
        }

        map
    }

    pub fn add_alias(&mut self, alias: impl Into<String>, table: impl Into<String>) {
        self.aliases.insert(alias.into(), table.into());
    }

    /// Resolves an alias or table reference to the table name.
    ///
    /// Unknown names resolve to themselves.
    pub fn resolve(&self, alias_or_table: &str) -> String {
        self.aliases
            .get(alias_or_table)
            .cloned()
            .unwrap_or_else(|| alias_or_table.to_string())
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// `table [AS] alias ...`
    fn add_table_entry(&mut self, entry: &str) {
        let parts: Vec<&str> = entry.split_whitespace().collect();
        let Some(table) = parts.first() else {
            return;
        };

        let alias = match parts.get(1) {
            Some(&"as") => parts.get(2).copied(),
            Some(word) if !is_keyword(word) => Some(*word),
            _ => None,
        };

        match alias {
            Some(alias) => self.add_alias(alias, *table),
            None => self.add_alias(*table, *table),
        }
    }
}

fn is_keyword(word: &str) -> bool {
    NON_ALIAS_KEYWORDS.contains(&word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_alias() {
        let map = AliasMap::from_clauses(Some("orders o"), "select * from orders o");
        assert_eq!(map.resolve("o"), "orders");
    }

    #[test]
    fn test_from_as_alias() {
        let map = AliasMap::from_clauses(Some("orders as ord"), "select * from orders as ord");
        assert_eq!(map.resolve("ord"), "orders");
    }

    #[test]
    fn test_join_aliases() {
        let sql = "select o.id from orders o join customers c on o.customer_id = c.id";
        let map = AliasMap::from_clauses(Some("orders o join customers c on o.customer_id = c.id"), sql);
        assert_eq!(map.resolve("o"), "orders");
        assert_eq!(map.resolve("c"), "customers");
    }

    #[test]
    fn test_keyword_is_not_alias() {
        let sql = "select * from orders join customers on orders.cid = customers.id";
        let map = AliasMap::from_clauses(Some("orders join customers on orders.cid = customers.id"), sql);
        assert_eq!(map.resolve("orders"), "orders");
        assert_eq!(map.resolve("customers"), "customers");
        assert_eq!(map.resolve("on"), "on");
    }

    #[test]
    fn test_unknown_resolves_to_itself() {
        let map = AliasMap::new();
        assert!(map.is_empty());
        assert_eq!(map.resolve("x"), "x");
    }

    #[test]
    fn test_comma_separated_tables() {
        let map = AliasMap::from_clauses(Some("orders o, customers c"), "select 1");
        assert_eq!(map.len(), 2);
        assert_eq!(map.resolve("c"), "customers");
    }
}
