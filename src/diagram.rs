use crate::block::{BlockResult, DiagramBlock, Operand};
use crate::expression::apply_operator;
use crate::numeric::round_to_precision;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// Resolves one operand against the results of the blocks before it.
///
/// `prior_results` holds exactly the blocks that come earlier in the list, so
/// a reference to the current block or anything after it falls outside the
/// slice and resolves to `None`. References to a block that is itself in
/// error or unresolved also give `None`.
///
/// # Arguments
/// * `operand` - The parsed slot
/// * `prior_results` - Results of blocks `1..current`, in list order
///
/// # Returns
/// * `Option<f64>` - The operand value, or `None` if it cannot be resolved
pub fn resolve_operand(operand: &Operand, prior_results: &[BlockResult]) -> Option<f64> {
    match operand {
        Operand::Reference(k) => {
            let index = k.checked_sub(1)?;
            match prior_results.get(index) {
                Some(BlockResult::Value(v)) => Some(*v),
                _ => None,
            }
        }
        Operand::Literal { value, is_percent } => {
            if *is_percent {
                Some(value / 100.0)
            } else {
                Some(*value)
            }
        }
        Operand::Invalid => None,
    }
}

/// Computes a single block.
///
/// Returns `Unresolved` if either operand does not resolve, `Error` on
/// division by zero or a non-finite outcome, and the unrounded value
/// otherwise.
pub fn compute_block(block: &DiagramBlock, prior_results: &[BlockResult]) -> BlockResult {
    let lhs = resolve_operand(block.left.operand(), prior_results);
    let rhs = resolve_operand(block.right.operand(), prior_results);

    let (lhs, rhs) = match (lhs, rhs) {
        (Some(l), Some(r)) => (l, r),
        _ => return BlockResult::Unresolved,
    };

    match apply_operator(lhs, block.operator, rhs) {
        Some(v) if v.is_finite() => BlockResult::Value(v),
        _ => BlockResult::Error,
    }
}

/// Recomputes every block in list order.
///
/// Each block sees only the results before it, which is why a single forward
/// pass is enough: references only ever point backward, so there is nothing
/// to sort and no cycle to detect. Values are rounded to display precision
/// before later blocks see them.
///
/// # Examples
/// ```
/// use blockcalc::block::{BlockResult, DiagramBlock};
/// use blockcalc::diagram::recompute_all;
///
/// let blocks = vec![
///     DiagramBlock::create(1, "5", "*", "20"),
///     DiagramBlock::create(2, "#1", "+", "30"),
///     DiagramBlock::create(3, "#2", "-", "15"),
/// ];
/// assert_eq!(
///     recompute_all(&blocks),
///     vec![BlockResult::Value(100.0), BlockResult::Value(130.0), BlockResult::Value(115.0)]
/// );
/// ```
pub fn recompute_all(blocks: &[DiagramBlock]) -> Vec<BlockResult> {
    let mut results = Vec::with_capacity(blocks.len());

    for block in blocks {
        let result = match compute_block(block, &results) {
            BlockResult::Value(v) => BlockResult::Value(round_to_precision(v)),
            other => other,
        };
        trace!("block {} -> {:?}", block.id, result);
        results.push(result);
    }

    debug!("recomputed {} blocks", blocks.len());
    results
}

/// Which operand slot of a block to edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// A drawn connection: block `target` refers to block `source`.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Link {
    pub source: u32,
    pub target: u32,
}

/// Plain slot content used when bulk-loading blocks.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct BlockContent {
    pub left: String,
    #[serde(default)]
    pub operator: String,
    pub right: String,
}

/// The diagram tool's ordered block list.
///
/// Position in `blocks` is what `#k` references address. Inserting or
/// removing a block therefore changes what every later reference points at;
/// callers recompute after each edit.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Diagram {
    pub blocks: Vec<DiagramBlock>,
    next_id: u32,
}

impl Default for Diagram {
    fn default() -> Self {
        Diagram {
            blocks: Vec::new(),
            next_id: 1,
        }
    }
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a diagram from existing blocks; new ids continue after the largest one.
    pub fn from_blocks(blocks: Vec<DiagramBlock>) -> Self {
        let next_id = blocks
            .iter()
            .map(|b| b.id)
            .max()
            .map_or(1, |id| id.saturating_add(1));
        Diagram { blocks, next_id }
    }

    /// Replaces the whole list with freshly numbered blocks.
    pub fn load_contents(&mut self, contents: &[BlockContent]) {
        self.blocks.clear();
        for content in contents {
            self.add_block(&content.left, &content.operator, &content.right);
        }
        debug!("loaded {} blocks", self.blocks.len());
    }

    pub fn contents(&self) -> Vec<BlockContent> {
        self.blocks
            .iter()
            .map(|b| BlockContent {
                left: b.left.raw().to_string(),
                operator: b.operator.symbol().to_string(),
                right: b.right.raw().to_string(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Appends a block and returns its id.
    pub fn add_block(&mut self, left: &str, operator: &str, right: &str) -> u32 {
        let id = self.free_id();
        self.next_id = id.saturating_add(1);
        self.blocks.push(DiagramBlock::create(id, left, operator, right));
        id
    }

    // Counter value, or the lowest unused id once the counter has hit u32::MAX.
    fn free_id(&self) -> u32 {
        if self.block(self.next_id).is_none() {
            return self.next_id;
        }
        (1..=u32::MAX)
            .find(|id| self.block(*id).is_none())
            .unwrap_or(self.next_id)
    }

    /// Removes the block with `id`. Returns false if there is none.
    pub fn remove_block(&mut self, id: u32) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.id != id);
        before != self.blocks.len()
    }

    pub fn block(&self, id: u32) -> Option<&DiagramBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// 1-based position of the block with `id`.
    pub fn position_of(&self, id: u32) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id).map(|i| i + 1)
    }

    /// Id of the block at 1-based `position`.
    pub fn id_at(&self, position: usize) -> Option<u32> {
        position
            .checked_sub(1)
            .and_then(|i| self.blocks.get(i))
            .map(|b| b.id)
    }

    pub fn update_slot(&mut self, id: u32, side: Side, raw: &str) -> bool {
        match self.blocks.iter_mut().find(|b| b.id == id) {
            Some(block) => {
                match side {
                    Side::Left => block.set_left(raw),
                    Side::Right => block.set_right(raw),
                }
                true
            }
            None => false,
        }
    }

    pub fn set_operator(&mut self, id: u32, raw: &str) -> bool {
        match self.blocks.iter_mut().find(|b| b.id == id) {
            Some(block) => {
                block.set_operator(raw);
                true
            }
            None => false,
        }
    }

    pub fn recompute(&self) -> Vec<BlockResult> {
        recompute_all(&self.blocks)
    }

    /// Every back-reference that currently points at an earlier block.
    pub fn links(&self) -> Vec<Link> {
        let mut links = Vec::new();
        for (index, block) in self.blocks.iter().enumerate() {
            for k in block.references() {
                if k >= 1 && k - 1 < index {
                    links.push(Link {
                        source: self.blocks[k - 1].id,
                        target: block.id,
                    });
                }
            }
        }
        links
    }
}
