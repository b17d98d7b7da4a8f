//! Value chains
//!
//! `ecmaFeatures` and `globals` can be set directly by a layer or contributed
//! by an enabled environment, and which environments are active is only known
//! after every layer has been combined. Each key therefore records its full
//! override history as an immutable, priority-ordered singly linked list and
//! is only resolved against the final merged `env` map (see
//! [`FieldChains::snapshot`]).
//!
//! Links are shared between layers through `Rc` and never mutated after
//! construction; merging always allocates new links.

use std::collections::BTreeMap;
use std::rc::Rc;

/// One assertion of a value: eligible when `origin_env` is `None` or names an
/// environment that ends up enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLink {
    pub origin_env: Option<String>,
    pub value: bool,
    pub next: Chain,
}

/// Head-first list of assertions, highest priority first.
pub type Chain = Option<Rc<ChainLink>>;

/// Per-key value chains for one conditioned field (`ecmaFeatures` or
/// `globals`). Keys are independent of each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldChains {
    chains: BTreeMap<String, Chain>,
}

impl FieldChains {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }

    pub fn chain(&self, key: &str) -> Chain {
        self.chains.get(key).cloned().flatten()
    }

    /// Record one assertion per key in `values`, at the head of that key's
    /// chain. `origin_env = None` means the assertion always applies.
    pub fn assert_values<'a, I>(&mut self, values: I, origin_env: Option<&str>)
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        for (key, value) in values {
            let existing = self.chains.get(key).cloned().flatten();
            let link = Rc::new(ChainLink {
                origin_env: origin_env.map(str::to_string),
                value,
                next: existing,
            });
            self.chains.insert(key.to_string(), Some(link));
        }
    }

    /// Merge another map's chains in front of this one's.
    ///
    /// Per key: a chain we don't have yet is adopted by reference (both sides
    /// are immutable); a chain we do have gets a structural clone of the
    /// incoming chain spliced in front of it. Either way the incoming chain
    /// is checked first on resolution, and `other` is left untouched.
    pub fn merge_from(&mut self, other: &FieldChains) {
        for (key, incoming) in &other.chains {
            match self.chains.get(key).cloned().flatten() {
                None => {
                    self.chains.insert(key.clone(), incoming.clone());
                }
                Some(existing) => {
                    let spliced = splice(incoming, Some(existing));
                    self.chains.insert(key.clone(), spliced);
                }
            }
        }
    }

    /// Resolve every chain against the final active-environment map.
    ///
    /// Each key takes the value of its first eligible link; a key with no
    /// eligible link is absent from the result, not defaulted.
    pub fn snapshot(&self, active_env: &BTreeMap<String, bool>) -> BTreeMap<String, bool> {
        let mut resolved = BTreeMap::new();

        for (key, chain) in &self.chains {
            let mut link = chain.as_ref();
            while let Some(current) = link {
                let eligible = match &current.origin_env {
                    None => true,
                    Some(env) => active_env.get(env).copied() == Some(true),
                };
                if eligible {
                    resolved.insert(key.clone(), current.value);
                    break;
                }
                link = current.next.as_ref();
            }
        }

        resolved
    }
}

/// Rebuild `front` link by link so its final link points at `back`.
/// Cloning is required: `front` may be shared by other layers.
fn splice(front: &Chain, back: Chain) -> Chain {
    match front {
        None => back,
        Some(link) => {
            let next = splice(&link.next, back);
            Some(Rc::new(ChainLink {
                origin_env: link.origin_env.clone(),
                value: link.value,
                next,
            }))
        }
    }
}
