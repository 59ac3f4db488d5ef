use once_cell::sync::Lazy;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock};
use string_interner::{DefaultBackend, DefaultSymbol, StringInterner};
use string_interner::Symbol as _;

static GLOBAL: Lazy<Interner> = Lazy::new(Interner::new);

struct InternerState {
    strings: StringInterner<DefaultBackend>,
    // Indexed by the interner's handle; one shared allocation per text.
    names: Vec<Arc<str>>,
}

/// Symbol table mapping text to a single canonical [`Symbol`].
///
/// Cloning an `Interner` is cheap and yields a handle to the same table.
/// Symbols are only comparable with symbols from the same table.
#[derive(Clone)]
pub struct Interner {
    state: Arc<RwLock<InternerState>>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    /// Create a new, empty symbol table
    pub fn new() -> Self {
        Interner {
            state: Arc::new(RwLock::new(InternerState {
                strings: StringInterner::new(),
                names: Vec::new(),
            })),
        }
    }

    /// The process-wide table used by `parse` and `Environment::new`
    pub fn global() -> &'static Interner {
        &GLOBAL
    }

    /// Return the symbol for `text`, registering it on first use
    pub fn intern(&self, text: &str) -> Symbol {
        if let Some(symbol) = self.get(text) {
            return symbol;
        }

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let id = state.strings.get_or_intern(text);
        // Another writer may have registered the same text between our read and write.
        if id.to_usize() == state.names.len() {
            log::trace!("interned new symbol `{text}`");
            state.names.push(Arc::from(text));
        }
        Symbol {
            id,
            name: Arc::clone(&state.names[id.to_usize()]),
        }
    }

    /// Look up an already interned symbol without registering it
    pub fn get(&self, text: &str) -> Option<Symbol> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let id = state.strings.get(text)?;
        Some(Symbol {
            id,
            name: Arc::clone(&state.names[id.to_usize()]),
        })
    }

    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .names
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interner").field("len", &self.len()).finish()
    }
}

/// An interned identifier.
///
/// Two symbols are equal only when they are the same table entry, which
/// makes environment lookup a handle comparison.
#[derive(Clone)]
pub struct Symbol {
    id: DefaultSymbol,
    name: Arc<str>,
}

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Position of this symbol in its interner
    pub fn index(&self) -> usize {
        self.id.to_usize()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.name, &other.name)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.name)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
