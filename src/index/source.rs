use anyhow::Result;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use super::cache::ParseCache;
use super::java::JavaSourceParser;
use super::scanner::FileScanner;
use super::{FileParse, MarkerKind, NotResolvable, ReferenceReader, TypeIndex, TypeRecord};

/// `java.lang` names that an unqualified reference may legitimately mean.
/// They resolve to `java.lang.*` instead of the file's own package.
const JAVA_LANG_TYPES: &[&str] = &[
    "String",
    "Object",
    "Integer",
    "Long",
    "Short",
    "Byte",
    "Double",
    "Float",
    "Boolean",
    "Character",
    "Number",
    "Void",
    "Math",
    "System",
    "Thread",
    "Runnable",
    "Iterable",
    "Comparable",
    "CharSequence",
    "StringBuilder",
    "StringBuffer",
    "Class",
    "Enum",
    "Throwable",
    "Error",
    "Exception",
    "RuntimeException",
    "IllegalArgumentException",
    "IllegalStateException",
    "IndexOutOfBoundsException",
    "NullPointerException",
    "UnsupportedOperationException",
    "Override",
    "Deprecated",
    "SuppressWarnings",
    "FunctionalInterface",
    "SafeVarargs",
];

/// The resolved type set of one scan: name-keyed records plus a direct
/// subtype map. Implements both collaborator seams the finder consumes.
#[derive(Debug, Default)]
pub struct SourceIndex {
    types: HashMap<String, TypeRecord>,
    direct_subtypes: HashMap<String, Vec<String>>,
}

impl SourceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an already-resolved record. Tests build synthetic type sets
    /// through this without going through the Java parser.
    pub fn insert(&mut self, record: TypeRecord) {
        for parent in record.interfaces.iter().chain(record.superclass.iter()) {
            self.direct_subtypes
                .entry(parent.clone())
                .or_default()
                .push(record.fully_qualified_name.clone());
        }
        self.types
            .insert(record.fully_qualified_name.clone(), record);
    }

    /// Merge per-file parses, resolving simple names to fully qualified ones
    /// against the complete set of scanned types.
    pub fn from_file_parses(parses: Vec<FileParse>) -> Self {
        let known: HashSet<String> = parses
            .iter()
            .flat_map(|p| p.types.iter().map(|t| t.fully_qualified_name.clone()))
            .collect();

        let mut index = Self::new();
        for parse in parses {
            let scope = NameScope {
                package: &parse.package,
                imports: &parse.imports,
                wildcard_imports: &parse.wildcard_imports,
                known: &known,
            };
            for mut record in parse.types {
                record.interfaces = record
                    .interfaces
                    .iter()
                    .map(|name| scope.resolve(name))
                    .collect();
                record.superclass = record.superclass.as_deref().map(|name| scope.resolve(name));
                record.referenced_types = record
                    .referenced_types
                    .iter()
                    .map(|name| scope.resolve(name))
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect();
                index.insert(record);
            }
        }
        index
    }

    #[allow(dead_code)]
    pub fn get(&self, type_name: &str) -> Option<&TypeRecord> {
        self.types.get(type_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeIndex for SourceIndex {
    fn types_with_marker(&self, marker: MarkerKind) -> Vec<&TypeRecord> {
        let mut matches: Vec<&TypeRecord> = self
            .types
            .values()
            .filter(|record| record.has_marker(marker))
            .collect();
        matches.sort_by(|a, b| a.fully_qualified_name.cmp(&b.fully_qualified_name));
        matches
    }

    fn subtypes_of(&self, type_name: &str) -> Vec<String> {
        let mut result = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(type_name.to_string());

        let mut stack = vec![type_name.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(children) = self.direct_subtypes.get(&current) {
                for child in children {
                    if seen.insert(child.clone()) {
                        result.push(child.clone());
                        stack.push(child.clone());
                    }
                }
            }
        }

        result.sort();
        result
    }
}

impl ReferenceReader for SourceIndex {
    fn referenced_type_names(&self, type_name: &str) -> Result<&[String], NotResolvable> {
        self.types
            .get(type_name)
            .map(|record| record.referenced_types.as_slice())
            .ok_or_else(|| NotResolvable(type_name.to_string()))
    }
}

/// Name resolution context of one source file.
struct NameScope<'a> {
    package: &'a str,
    imports: &'a [String],
    wildcard_imports: &'a [String],
    known: &'a HashSet<String>,
}

impl NameScope<'_> {
    /// Resolution order: already qualified, explicit import, same-package
    /// type known to the index, wildcard import candidate known to the
    /// index, `java.lang`, then the same-package assumption. Always yields a
    /// name so that interface declaration order keeps its arity.
    fn resolve(&self, raw: &str) -> String {
        if raw.contains('.') {
            return raw.to_string();
        }
        if let Some(import) = self
            .imports
            .iter()
            .find(|import| import.rsplit('.').next() == Some(raw))
        {
            return import.clone();
        }
        let same_package = if self.package.is_empty() {
            raw.to_string()
        } else {
            format!("{}.{}", self.package, raw)
        };
        if self.known.contains(&same_package) {
            return same_package;
        }
        for wildcard in self.wildcard_imports {
            let candidate = format!("{}.{}", wildcard, raw);
            if self.known.contains(&candidate) {
                return candidate;
            }
        }
        if JAVA_LANG_TYPES.contains(&raw) {
            return format!("java.lang.{}", raw);
        }
        same_package
    }
}

/// Scans a directory, parses Java files (with cache reuse) and produces a
/// resolved [`SourceIndex`].
pub struct SourceIndexer {
    file_scanner: FileScanner,
    parser: JavaSourceParser,
    parse_cache: ParseCache,
}

impl SourceIndexer {
    pub fn new() -> Self {
        Self {
            file_scanner: FileScanner::new(),
            parser: JavaSourceParser::new(),
            parse_cache: ParseCache::new(None).unwrap_or_else(|err| {
                eprintln!("Warning: Failed to initialize disk parse cache: {err}");
                ParseCache::in_memory_only()
            }),
        }
    }

    pub fn without_disk_cache() -> Self {
        Self {
            file_scanner: FileScanner::new(),
            parser: JavaSourceParser::new(),
            parse_cache: ParseCache::in_memory_only(),
        }
    }

    pub fn index(&mut self, root_path: &Path) -> Result<SourceIndex> {
        println!("Scanning sources...");
        let files = self.file_scanner.scan_directory(root_path)?;
        println!("Found {} Java files to index", files.len());

        let mut cached_count = 0;
        let mut parses = Vec::with_capacity(files.len());

        for file_info in &files {
            match self.parse_cache.needs_update(&file_info.path) {
                Ok(needs_update) => {
                    if !needs_update {
                        if let Some(cached_parse) = self.parse_cache.get(&file_info.path) {
                            parses.push(cached_parse);
                            cached_count += 1;
                            continue;
                        }
                    }
                }
                Err(err) => {
                    eprintln!(
                        "Warning: Failed to validate cache entry for {}: {}",
                        file_info.path.display(),
                        err
                    );
                }
            }

            match self.parser.parse_file(&file_info.path) {
                Ok(parse) => {
                    if let Err(e) = self.parse_cache.store(&file_info.path, &parse) {
                        eprintln!(
                            "Warning: Failed to cache {}: {}",
                            file_info.path.display(),
                            e
                        );
                    }
                    parses.push(parse);
                }
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to parse {}: {}",
                        file_info.path.display(),
                        e
                    );
                }
            }
        }

        println!(
            "Cache hits: {}, Parsed: {}",
            cached_count,
            parses.len() - cached_count
        );

        let index = SourceIndex::from_file_parses(parses);
        println!("Indexed {} types", index.len());

        Ok(index)
    }
}

impl Default for SourceIndexer {
    fn default() -> Self {
        Self::new()
    }
}
