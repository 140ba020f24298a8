#![allow(dead_code)]

use transfer_selection::organization::{DelegateUser, OrgUnit, StaffMember};

/// Minimal linear congruential generator so randomised tests are repeatable.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407))
    }

    pub fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    pub fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }

    pub fn chance(&mut self, percent: u64) -> bool {
        self.below(100) < percent
    }
}

/// HQ > Dept A > Team A1, HQ > Dept B, plus an unstaffed Archive branch.
pub fn org_units() -> Vec<OrgUnit> {
    vec![
        OrgUnit::new(1, None, "HQ"),
        OrgUnit::new(2, Some(1), "Dept A"),
        OrgUnit::new(3, Some(2), "Team A1"),
        OrgUnit::new(4, Some(1), "Dept B"),
        OrgUnit::new(5, Some(1), "Archive"),
        OrgUnit::new(6, Some(5), "Cold Storage"),
    ]
}

pub fn org_staff() -> Vec<StaffMember> {
    vec![
        StaffMember::new(10, "Alice", 2)
            .lead()
            .with_position("Head of Dept A", 1)
            .with_delegates(vec![DelegateUser::new(12, "Carol")]),
        StaffMember::new(11, "Bob", 2).with_position("Clerk", 2),
        StaffMember::new(30, "Tom", 3).lead().with_position("Team lead", 1),
        StaffMember::new(31, "Uma", 3),
        StaffMember::new(40, "Vic", 4),
    ]
}

/// Random forest of `units` units with staff sprinkled over roughly half of them.
pub fn random_org(rng: &mut Lcg, units: i64) -> (Vec<OrgUnit>, Vec<StaffMember>) {
    let mut org = Vec::new();
    let mut staff = Vec::new();
    for id in 1..=units {
        let parent = if id == 1 || rng.chance(20) {
            None
        } else {
            Some(1 + rng.below((id - 1) as u64) as i64)
        };
        org.push(OrgUnit::new(id, parent, format!("Unit {}", id)));

        if rng.chance(50) {
            let members = 1 + rng.below(3) as i64;
            for m in 0..members {
                let mut member = StaffMember::new(id * 100 + m, format!("Staff {}-{}", id, m), id);
                if m == 0 && rng.chance(60) {
                    member = member.lead();
                }
                staff.push(member);
            }
        }
    }
    (org, staff)
}
