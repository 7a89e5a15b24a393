use log::debug;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

extern "C" fn handle_interrupt(_: libc::c_int) {
    // 信号处理函数里只能用 async-signal-safe 的调用
    let newline = b"\n";
    unsafe {
        libc::write(
            libc::STDERR_FILENO,
            newline.as_ptr() as *const libc::c_void,
            newline.len(),
        );
    }
}

/// Ctrl-C 不退出 shell，只换行。不能用 `SIG_IGN`，exec 之后子进程要恢复默认行为。
pub fn install_interrupt_handler() -> nix::Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(handle_interrupt),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    unsafe { sigaction(Signal::SIGINT, &action) }?;
    debug!("SIGINT 处理函数安装完成");
    Ok(())
}
