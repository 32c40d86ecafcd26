//! Depth tree behind hierarchical indices
//!
//! Nodes live in one arena and refer to their children by arena id. Each node
//! holds an [`Index`] over the keys of its branch and the first global position
//! its subtree covers; offsets are recomputed by one traversal after any
//! structural change.

use std::collections::HashSet;
use std::ops::Range;

use super::{HLoc, Index, LocKey};
use crate::block::IlocKey;
use crate::error::{Error, Result};
use crate::value::Label;

/// Nested labels for [`IndexLevel::from_tree`]
#[derive(Debug, Clone, PartialEq)]
pub enum LabelTree {
    /// Innermost labels of one branch
    Leaves(Vec<Label>),
    /// Keys of one depth, each with its subtree
    Branches(Vec<(Label, LabelTree)>),
}

impl LabelTree {
    pub fn leaves<I, L>(labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        LabelTree::Leaves(labels.into_iter().map(Into::into).collect())
    }

    pub fn branches<I, L>(items: I) -> Self
    where
        I: IntoIterator<Item = (L, LabelTree)>,
        L: Into<Label>,
    {
        LabelTree::Branches(items.into_iter().map(|(k, t)| (k.into(), t)).collect())
    }
}

#[derive(Debug, Clone)]
struct LevelNode {
    /// Keys of this branch at this depth
    index: Index,
    /// First global position covered by this subtree
    offset: usize,
    /// Child node per key; `None` for leaves
    targets: Option<Vec<usize>>,
    /// Number of positions covered
    len: usize,
}

impl LevelNode {
    fn leaf(index: Index) -> Self {
        let len = index.len();
        LevelNode {
            index,
            offset: 0,
            targets: None,
            len,
        }
    }

    fn branch(index: Index, targets: Vec<usize>) -> Self {
        LevelNode {
            index,
            offset: 0,
            targets: Some(targets),
            len: 0,
        }
    }
}

/// Tree of per-depth indices mapping label tuples to positions
#[derive(Debug, Clone)]
pub struct IndexLevel {
    nodes: Vec<LevelNode>,
    root: usize,
    depth: usize,
}

impl IndexLevel {
    /// A tree of the given depth with no positions
    pub fn empty(depth: usize) -> Self {
        let node = if depth <= 1 {
            LevelNode::leaf(Index::empty())
        } else {
            LevelNode::branch(Index::empty(), Vec::new())
        };
        IndexLevel {
            nodes: vec![node],
            root: 0,
            depth: depth.max(1),
        }
    }

    /// Build from explicitly nested labels
    ///
    /// Every leaf must sit at the same depth.
    pub fn from_tree(tree: &LabelTree) -> Result<Self> {
        let mut level = IndexLevel {
            nodes: Vec::new(),
            root: 0,
            depth: 0,
        };
        level.root = level.build_tree(tree)?;
        let depth = {
            let mut depths = level.depths();
            let depth = depths.next().unwrap_or(1);
            if let Some(other) = depths.find(|d| *d != depth) {
                return Err(Error::MalformedHierarchy(format!(
                    "leaves found at depth {} and {}",
                    depth, other
                )));
            }
            depth
        };
        level.depth = depth;
        level.recompute_offsets();
        Ok(level)
    }

    fn build_tree(&mut self, tree: &LabelTree) -> Result<usize> {
        let node = match tree {
            LabelTree::Leaves(labels) => LevelNode::leaf(Index::new(labels.iter().cloned())?),
            LabelTree::Branches(items) => {
                let mut targets = Vec::with_capacity(items.len());
                for (_, subtree) in items {
                    targets.push(self.build_tree(subtree)?);
                }
                LevelNode::branch(Index::new(items.iter().map(|(k, _)| k.clone()))?, targets)
            }
        };
        self.nodes.push(node);
        Ok(self.nodes.len() - 1)
    }

    /// Build from fixed-depth label rows grouped by prefix
    ///
    /// Rows sharing a prefix must be contiguous; a prefix that reappears after
    /// a different one is a malformed hierarchy. A repeated full row is a
    /// duplicate label.
    pub fn from_labels(rows: &[Vec<Label>], depth: usize) -> Result<Self> {
        if depth == 0 {
            return Err(Error::MalformedHierarchy("depth must be at least 1".into()));
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != depth) {
            return Err(Error::MalformedHierarchy(format!(
                "label of depth {} in a hierarchy of depth {}",
                bad.len(),
                depth
            )));
        }
        if rows.is_empty() {
            return Ok(IndexLevel::empty(depth));
        }
        let mut level = IndexLevel {
            nodes: Vec::new(),
            root: 0,
            depth,
        };
        let refs: Vec<&[Label]> = rows.iter().map(Vec::as_slice).collect();
        level.root = level.build_rows(&refs, 0)?;
        level.recompute_offsets();
        Ok(level)
    }

    fn build_rows(&mut self, rows: &[&[Label]], d: usize) -> Result<usize> {
        if d + 1 == self.depth {
            let mut index = Index::empty();
            for row in rows {
                index.push(row[d].clone()).map_err(|_| {
                    Error::DuplicateLabel(format!("{}", Label::Tuple(row.to_vec())))
                })?;
            }
            self.nodes.push(LevelNode::leaf(index));
            return Ok(self.nodes.len() - 1);
        }
        let mut keys: Vec<Label> = Vec::new();
        let mut groups: Vec<Vec<&[Label]>> = Vec::new();
        let mut seen: HashSet<&Label> = HashSet::new();
        for &row in rows {
            let key = &row[d];
            if keys.last() == Some(key) {
                if let Some(group) = groups.last_mut() {
                    group.push(row);
                }
                continue;
            }
            if !seen.insert(key) {
                return Err(Error::MalformedHierarchy(format!(
                    "label {} at depth {} is not contiguous",
                    key, d
                )));
            }
            keys.push(key.clone());
            groups.push(vec![row]);
        }
        let mut targets = Vec::with_capacity(groups.len());
        for group in &groups {
            targets.push(self.build_rows(group, d + 1)?);
        }
        self.nodes.push(LevelNode::branch(Index::new(keys)?, targets));
        Ok(self.nodes.len() - 1)
    }

    /// Build the Cartesian product of per-depth labels
    pub fn from_product(levels: &[Vec<Label>]) -> Result<Self> {
        if levels.is_empty() {
            return Err(Error::MalformedHierarchy("no levels given".into()));
        }
        let mut level = IndexLevel {
            nodes: Vec::new(),
            root: 0,
            depth: levels.len(),
        };
        level.root = level.build_product(levels, 0)?;
        level.recompute_offsets();
        Ok(level)
    }

    fn build_product(&mut self, levels: &[Vec<Label>], d: usize) -> Result<usize> {
        let index = Index::new(levels[d].iter().cloned())?;
        let node = if d + 1 == levels.len() {
            LevelNode::leaf(index)
        } else {
            let mut targets = Vec::with_capacity(index.len());
            for _ in 0..index.len() {
                targets.push(self.build_product(levels, d + 1)?);
            }
            LevelNode::branch(index, targets)
        };
        self.nodes.push(node);
        Ok(self.nodes.len() - 1)
    }

    fn recompute_offsets(&mut self) {
        fn visit(nodes: &mut [LevelNode], id: usize, offset: usize) -> usize {
            nodes[id].offset = offset;
            let len = match nodes[id].targets.clone() {
                None => nodes[id].index.len(),
                Some(targets) => {
                    let mut next = offset;
                    for target in targets {
                        next += visit(nodes, target, next);
                    }
                    next - offset
                }
            };
            nodes[id].len = len;
            len
        }
        visit(&mut self.nodes, self.root, 0);
    }

    /// Number of positions
    pub fn len(&self) -> usize {
        self.nodes[self.root].len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Depth of every leaf node, leftmost first
    pub fn depths(&self) -> impl Iterator<Item = usize> + '_ {
        let mut stack = vec![(self.root, 1usize)];
        std::iter::from_fn(move || {
            while let Some((id, d)) = stack.pop() {
                match &self.nodes[id].targets {
                    None => return Some(d),
                    Some(targets) => stack.extend(targets.iter().rev().map(|t| (*t, d + 1))),
                }
            }
            None
        })
    }

    /// Every label row in position order
    pub fn labels(&self) -> Vec<Vec<Label>> {
        let mut out = Vec::with_capacity(self.len());
        let mut prefix = Vec::with_capacity(self.depth);
        self.collect(self.root, &mut prefix, &mut out);
        out
    }

    fn collect(&self, id: usize, prefix: &mut Vec<Label>, out: &mut Vec<Vec<Label>>) {
        let node = &self.nodes[id];
        match &node.targets {
            None => {
                for label in node.index.labels() {
                    let mut row = prefix.clone();
                    row.push(label.clone());
                    out.push(row);
                }
            }
            Some(targets) => {
                for (label, target) in node.index.labels().iter().zip(targets) {
                    prefix.push(label.clone());
                    self.collect(*target, prefix, out);
                    prefix.pop();
                }
            }
        }
    }

    /// Label row at a position
    pub fn label_at(&self, pos: usize) -> Option<Vec<Label>> {
        if pos >= self.len() {
            return None;
        }
        let mut row = Vec::with_capacity(self.depth);
        let mut id = self.root;
        loop {
            let node = &self.nodes[id];
            match &node.targets {
                None => {
                    row.push(node.index.label_at(pos - node.offset)?.clone());
                    return Some(row);
                }
                Some(targets) => {
                    let i = targets
                        .partition_point(|t| self.nodes[*t].offset + self.nodes[*t].len <= pos);
                    row.push(node.index.label_at(i)?.clone());
                    id = *targets.get(i)?;
                }
            }
        }
    }

    /// Resolve a per-depth key into positions
    ///
    /// A key of scalar labels yields a single position when it names every
    /// depth and a slice when it names leading depths only. Any wildcard,
    /// slice, or list yields a list in stored order. When a depth is searched
    /// in more than one branch, branches lacking a label are skipped, but each
    /// requested label must match somewhere.
    pub fn loc_to_iloc(&self, key: &HLoc) -> Result<IlocKey> {
        let parts = key.parts();
        if parts.is_empty() || parts.len() > self.depth {
            return Err(Error::KeyNotFound(format!(
                "key of depth {} against a hierarchy of depth {}",
                parts.len(),
                self.depth
            )));
        }
        let mut frontier = vec![self.root];
        let mut pieces: Vec<Range<usize>> = Vec::new();
        for (d, part) in parts.iter().enumerate() {
            let fanned = frontier.len() > 1;
            let mut matched = vec![false; requested(part)];
            let mut next = Vec::new();
            for &id in &frontier {
                let node = &self.nodes[id];
                let positions = match_part(&node.index, part, fanned, &mut matched, d)?;
                match &node.targets {
                    Some(targets) => next.extend(positions.iter().map(|p| targets[*p])),
                    None => pieces.extend(positions.iter().map(|p| {
                        let at = node.offset + p;
                        at..at + 1
                    })),
                }
            }
            if let Some(missing) = matched.iter().position(|m| !m) {
                return Err(Error::KeyNotFound(format!(
                    "{} at depth {}",
                    requested_label(part, missing),
                    d
                )));
            }
            frontier = next;
        }
        for id in frontier {
            let node = &self.nodes[id];
            if node.len > 0 {
                pieces.push(node.offset..node.offset + node.len);
            }
        }
        if pieces.is_empty() {
            return Err(Error::KeyNotFound("no labels matched across all depths".into()));
        }
        if !key.is_multiple() && pieces.len() == 1 {
            let run = pieces.remove(0);
            return Ok(if parts.len() == self.depth {
                IlocKey::Position(run.start)
            } else {
                IlocKey::Slice(run)
            });
        }
        Ok(IlocKey::List(pieces.into_iter().flatten().collect()))
    }

    /// Wrap every position under one new outermost key
    pub fn add_level(&self, key: Label) -> Result<IndexLevel> {
        let mut level = self.clone();
        let old_root = level.root;
        level
            .nodes
            .push(LevelNode::branch(Index::new([key])?, vec![old_root]));
        level.root = level.nodes.len() - 1;
        level.depth += 1;
        level.recompute_offsets();
        Ok(level)
    }

    /// Append one label row after every existing position
    ///
    /// Shared prefixes must belong to the trailing branch at every depth so
    /// that no existing position moves.
    pub fn append(&mut self, row: &[Label]) -> Result<()> {
        if row.len() != self.depth {
            return Err(Error::MalformedHierarchy(format!(
                "label of depth {} in a hierarchy of depth {}",
                row.len(),
                self.depth
            )));
        }
        let mut id = self.root;
        for (d, key) in row.iter().enumerate() {
            let found = self.nodes[id].index.position(key);
            let is_leaf = self.nodes[id].targets.is_none();
            match (found, is_leaf) {
                (Some(_), true) => {
                    return Err(Error::DuplicateLabel(format!("{}", Label::Tuple(row.to_vec()))))
                }
                (Some(p), false) => {
                    if p + 1 != self.nodes[id].index.len() {
                        return Err(Error::MalformedHierarchy(format!(
                            "cannot append under {} at depth {}: it is not the last branch",
                            key, d
                        )));
                    }
                    id = match &self.nodes[id].targets {
                        Some(targets) => targets[p],
                        None => id,
                    };
                }
                (None, true) => {
                    self.nodes[id].index.push(key.clone())?;
                    break;
                }
                (None, false) => {
                    let child = self.build_chain(&row[d + 1..]);
                    let node = &mut self.nodes[id];
                    node.index.push(key.clone())?;
                    if let Some(targets) = node.targets.as_mut() {
                        targets.push(child);
                    }
                    break;
                }
            }
        }
        self.recompute_offsets();
        Ok(())
    }

    fn build_chain(&mut self, rest: &[Label]) -> usize {
        let node = match rest {
            [last] => LevelNode::leaf(Index::from_labels_unchecked(vec![last.clone()])),
            [first, tail @ ..] => {
                let child = self.build_chain(tail);
                LevelNode::branch(Index::from_labels_unchecked(vec![first.clone()]), vec![child])
            }
            [] => LevelNode::leaf(Index::empty()),
        };
        self.nodes.push(node);
        self.nodes.len() - 1
    }
}

fn requested(part: &LocKey) -> usize {
    match part {
        LocKey::Label(_) => 1,
        LocKey::List(labels) => labels.len(),
        _ => 0,
    }
}

fn requested_label(part: &LocKey, i: usize) -> String {
    match part {
        LocKey::Label(label) => format!("{}", label),
        LocKey::List(labels) => labels.get(i).map(|l| format!("{}", l)).unwrap_or_default(),
        other => format!("{:?}", other),
    }
}

fn match_part(index: &Index, part: &LocKey, fanned: bool, matched: &mut [bool], depth: usize) -> Result<Vec<usize>> {
    match part {
        LocKey::All => Ok((0..index.len()).collect()),
        LocKey::Label(label) => match index.position(label) {
            Some(p) => {
                matched[0] = true;
                Ok(vec![p])
            }
            None if fanned => Ok(Vec::new()),
            None => Err(Error::KeyNotFound(format!("{} at depth {}", label, depth))),
        },
        LocKey::List(labels) => {
            let mut out = Vec::with_capacity(labels.len());
            for (i, label) in labels.iter().enumerate() {
                match index.position(label) {
                    Some(p) => {
                        matched[i] = true;
                        out.push(p);
                    }
                    None if fanned => {}
                    None => {
                        return Err(Error::KeyNotFound(format!("{} at depth {}", label, depth)))
                    }
                }
            }
            Ok(out)
        }
        LocKey::Slice { .. } => match index.loc_to_iloc(part) {
            Ok(IlocKey::Slice(range)) => Ok(range.collect()),
            Ok(other) => Ok(other.resolve(index.len())?.positions()),
            Err(Error::KeyNotFound(_)) if fanned => Ok(Vec::new()),
            Err(e) => Err(e),
        },
        other => Err(Error::Type(format!(
            "{:?} cannot select within a hierarchy depth",
            other
        ))),
    }
}
