//! Roles holding permission sets.
//!
//! Run with: cargo run --example permissions

use enum_family::prelude::*;

enumeration! {
    pub struct Permission;
    AddLabels,
    AddTopic,
    ViewMergeRequest,
    ApproveMergeRequest,
    DeleteMergeRequest,
}

enumeration! {
    pub struct Role {
        perms: EnumSet<'static, Permission> = Permission::enum_set(),
    }
    Guest,
    Reporter { perms: grant(&[Permission::view_merge_request()]) },
    Developer {
        perms: grant(&[
            Permission::add_labels(),
            Permission::add_topic(),
            Permission::view_merge_request(),
        ]),
    },
    Owner { perms: EnumSet::all(Permission::registry()) },
}

fn grant(perms: &[&'static Permission]) -> EnumSet<'static, Permission> {
    let mut set = Permission::enum_set();
    set.extend(perms.iter().copied());
    set
}

impl Role {
    pub fn has_perm(&self, perm: &Permission) -> bool {
        self.perms.contains(perm)
    }
}

fn main() {
    println!("=== Permissions ===\n");

    for role in Role::values() {
        println!("  {:<9} {}", role.name(), role.perms);
    }

    let approve = Permission::approve_merge_request();
    let allowed: Vec<&str> = Role::values()
        .iter()
        .filter(|r| r.has_perm(approve))
        .map(|r| r.name())
        .collect();
    println!("\n  may {approve}: {allowed:?}");

    let missing = Role::developer().perms.complement();
    println!("  developer lacks: {missing}");
}
