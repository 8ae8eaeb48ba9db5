/*!
# SceneLens DevKit - test doubles and helpers

- `mock_channel`: in-memory `Transport` recording posts, accepting injections
- `builders`: wire message and snapshot node builders
- `fixtures`: the demo scene and ready-made snapshots
- `contracts`: per-kind wire contracts and a payload validator
- `test_utils`: a harness with expectations and assertions over posts
*/

pub mod builders;
pub mod contracts;
pub mod fixtures;
pub mod mock_channel;
pub mod test_utils;

pub use builders::{MessageBuilder, NodeBuilder};
pub use contracts::{validate, WireContract, CONTRACTS};
pub use mock_channel::MockChannel;
pub use test_utils::{TestHarness, TestStats};
