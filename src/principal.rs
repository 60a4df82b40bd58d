//! Principal-name resolution against the system user and group databases.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::{CStr, CString};

/// Maps numeric owner/group ids to names and back.
///
/// The evaluator and the listing formatter only see this trait, so tests can
/// substitute an in-memory resolver instead of the platform databases.
pub trait PrincipalResolver {
    /// Login name for `uid`, if the user database knows it.
    fn user_name(&self, uid: u32) -> Option<String>;

    /// Uid for a login name, if one exists.
    fn uid_for_name(&self, name: &str) -> Option<u32>;

    /// Group name for `gid`, if the group database knows it.
    fn group_name(&self, gid: u32) -> Option<String>;
}

/// Resolver backed by the platform passwd and group databases.
///
/// Lookups by id are cached for the run, so a tree full of entries owned by
/// the same few principals hits the database once per principal. Negative
/// results are cached too, so an orphaned uid stays orphaned for the whole run.
#[derive(Default)]
pub struct SystemResolver {
    users: RefCell<HashMap<u32, Option<String>>>,
    groups: RefCell<HashMap<u32, Option<String>>>,
}

impl SystemResolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrincipalResolver for SystemResolver {
    fn user_name(&self, uid: u32) -> Option<String> {
        if let Some(cached) = self.users.borrow().get(&uid) {
            return cached.clone();
        }
        // Safety: getpwuid hands back a pointer into static storage. The name
        // is copied out before any other passwd lookup can overwrite it, and
        // the traversal is single-threaded.
        let name = unsafe {
            let pw = libc::getpwuid(uid as libc::uid_t);
            if pw.is_null() {
                None
            } else {
                Some(CStr::from_ptr((*pw).pw_name).to_string_lossy().into_owned())
            }
        };
        self.users.borrow_mut().insert(uid, name.clone());
        name
    }

    fn uid_for_name(&self, name: &str) -> Option<u32> {
        let cname = CString::new(name).ok()?;
        // Safety: same static-storage contract as getpwuid above.
        unsafe {
            let pw = libc::getpwnam(cname.as_ptr());
            if pw.is_null() { None } else { Some((*pw).pw_uid as u32) }
        }
    }

    fn group_name(&self, gid: u32) -> Option<String> {
        if let Some(cached) = self.groups.borrow().get(&gid) {
            return cached.clone();
        }
        // Safety: same static-storage contract as getpwuid above.
        let name = unsafe {
            let gr = libc::getgrgid(gid as libc::gid_t);
            if gr.is_null() {
                None
            } else {
                Some(CStr::from_ptr((*gr).gr_name).to_string_lossy().into_owned())
            }
        };
        self.groups.borrow_mut().insert(gid, name.clone());
        name
    }
}
