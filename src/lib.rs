/*!
# Block Calculator

The arithmetic core behind a classroom toolbox: a keypad calculator, a
notepad that solves the sums written in it, a diagram of chained calculation
blocks, and a function grapher. All four share one small expression
evaluator.

## Architecture

### Expression Evaluator
- Tokenizes a restricted grammar: numbers, `+ - * /`, and a `%` suffix
- Ignores any other character, so prose and math can share a line
- Reduces `*` and `/` first, then `+` and `-`, left to right within each pass
- `a + b%` adds b percent *of a*; elsewhere `b%` is `b / 100`
- Three outcomes: a number, an error marker (division by zero, non-finite),
  or no result (not arithmetic)

### Block Graph Evaluator
- An ordered list of blocks, each `left op right`
- Operands are numbers, percentages, or `#k` back-references to the k-th block
- References resolve by list position and may only point backward, so a
  single forward pass recomputes the whole diagram; there are no cycles
- Unresolved references (`?`) propagate forward without becoming errors

### Consumers
- Keypad calculator state machine
- Notepad line solver
- Function sampler for the grapher
- Diagram block list with link drawing

### Persistence
- Gzip-compressed bincode (`.bin.gz`) for diagrams
- JSON import/export of block contents

## Modules

- **numeric**: Rounding to display precision and number formatting
- **expression**: Tokenizer and evaluator
- **block**: Diagram block, operand slots and block results
- **diagram**: Block recomputation and the block list
- **calculator**: Keypad calculator
- **notepad**: Line solver
- **grapher**: Function sampling
- **settings**: JSON settings file
- **saving**: Diagram persistence
*/

pub mod block;
pub mod calculator;
pub mod diagram;
pub mod expression;
pub mod grapher;
pub mod notepad;
pub mod numeric;
pub mod saving;
pub mod settings;

/// Re-export everything from these modules to make it easier to use
pub use block::*;
pub use calculator::*;
pub use diagram::*;
pub use expression::*;
pub use grapher::*;
pub use notepad::*;
pub use numeric::*;
pub use saving::*;
pub use settings::*;
