//! 测试驱动模块
//!
//! 把虚拟时钟与事件循环组合起来：按步推进时间并在每步之后 pump 事件循环。

mod advancer;
mod event_loop;
mod fixture;
pub mod privilege;

pub use advancer::{Steps, TimeAdvancer};
pub use event_loop::EventLoop;
pub use fixture::{IoFixture, TimeTestContext};
pub use privilege::is_superuser;
