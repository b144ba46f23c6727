//! 需要超级用户权限的测试的跳过条件

use tracing::info;

/// 当前进程的有效用户是否为 root。
///
/// 在无法检查权限的平台上返回 true，即从不跳过。
pub fn is_superuser() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid 没有前置条件，且总是成功。
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        true
    }
}

#[doc(hidden)]
pub fn note_superuser_skip(test: &str) {
    info!(test, "This test case needs to be run as superuser, skipping");
}

/// 非 root 运行时提前从当前测试函数返回。
#[macro_export]
macro_rules! skip_if_not_superuser {
    () => {
        if !$crate::harness::is_superuser() {
            $crate::harness::privilege::note_superuser_skip(module_path!());
            return;
        }
    };
}
