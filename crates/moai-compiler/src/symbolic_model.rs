//! In-memory reference implementation of [`TargetModel`].

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use moai_core::{
    format_index, CompileError, IndexTuple, IndexValue, Parameter, Result, Set, Variable,
};

use crate::constraint::Sense;
use crate::expand::CartesianProduct;
use crate::registry::{Named, NamedList};
use crate::symbolic::{Resolved, ResolvedComparison};
use crate::target::TargetModel;

/// Handle to one member of a variable family: `x[1, 2]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarRef {
    name: Arc<str>,
    index: IndexTuple,
}

impl VarRef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> &[IndexValue] {
        &self.index
    }
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.index.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}[{}]", self.name, format_index(&self.index))
        }
    }
}

/// One compiled constraint instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintRecord {
    pub name: String,
    pub index: Option<IndexTuple>,
    pub comparison: ResolvedComparison<VarRef>,
}

impl fmt::Display for ConstraintRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.index {
            Some(index) => write!(f, "{}[{}]: {}", self.name, format_index(index), self.comparison),
            None => write!(f, "{}: {}", self.name, self.comparison),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveRecord {
    pub name: String,
    pub expr: Resolved<VarRef>,
    pub sense: Sense,
}

#[derive(Debug, Clone)]
struct VariableFamily {
    variable: Variable,
    members: Vec<VarRef>,
    lookup: HashMap<IndexTuple, usize>,
}

impl Named for VariableFamily {
    fn name(&self) -> &str {
        self.variable.name()
    }
}

/// Stores everything the compiler emits, symbolically.
///
/// Allocates one [`VarRef`] per element of each variable family's
/// product and keys constraint instances by `(name, index tuple)`.
#[derive(Debug, Clone, Default)]
pub struct SymbolicModel {
    sets: NamedList<Set>,
    parameters: NamedList<Parameter>,
    families: NamedList<VariableFamily>,
    constraints: Vec<ConstraintRecord>,
    keys: HashSet<(String, IndexTuple)>,
    objective: Option<ObjectiveRecord>,
}

impl SymbolicModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, name: &str) -> Option<&Set> {
        self.sets.get(name)
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    /// Declared variable families, in declaration order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.families.iter().map(|family| &family.variable)
    }

    /// Members of a family in product order.
    pub fn members(&self, name: &str) -> &[VarRef] {
        self.families
            .get(name)
            .map(|family| family.members.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of scalar decision variables.
    pub fn variable_count(&self) -> usize {
        self.families.iter().map(|family| family.members.len()).sum()
    }

    /// All constraint instances in emission order.
    pub fn constraints(&self) -> &[ConstraintRecord] {
        &self.constraints
    }

    /// Instances of one named constraint in emission order.
    pub fn constraint_instances<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a ConstraintRecord> + 'n
    where
        'a: 'n,
    {
        self.constraints.iter().filter(move |record| record.name == name)
    }

    /// Looks up an instance by name and index tuple. Use an empty tuple
    /// for unquantified constraints.
    pub fn constraint(&self, name: &str, index: &[IndexValue]) -> Option<&ConstraintRecord> {
        self.constraints.iter().find(|record| {
            record.name == name
                && record
                    .index
                    .as_deref()
                    .map_or(index.is_empty(), |own| own == index)
        })
    }

    pub fn objective(&self) -> Option<&ObjectiveRecord> {
        self.objective.as_ref()
    }
}

impl TargetModel for SymbolicModel {
    type Var = VarRef;

    fn declare_set(&mut self, set: &Set) -> Result<()> {
        self.sets.upsert(set.clone());
        Ok(())
    }

    fn declare_parameter(&mut self, parameter: &Parameter) -> Result<()> {
        self.parameters.upsert(parameter.clone());
        Ok(())
    }

    fn declare_variable_family(&mut self, variable: &Variable, index_sets: &[&Set]) -> Result<()> {
        if self.families.contains(variable.name()) {
            return Err(CompileError::Target(format!(
                "variable family `{}` declared twice",
                variable.name()
            )));
        }

        let name: Arc<str> = Arc::from(variable.name());
        let axes = index_sets.iter().map(|set| set.elements()).collect();
        let members: Vec<VarRef> = CartesianProduct::new(axes)
            .map(|index| VarRef {
                name: Arc::clone(&name),
                index,
            })
            .collect();
        let lookup = members
            .iter()
            .enumerate()
            .map(|(pos, member)| (member.index.clone(), pos))
            .collect();

        self.families.upsert(VariableFamily {
            variable: variable.clone(),
            members,
            lookup,
        });
        Ok(())
    }

    fn variable(&self, name: &str, index: &[IndexValue]) -> Option<VarRef> {
        let family = self.families.get(name)?;
        family
            .lookup
            .get(index)
            .map(|&pos| family.members[pos].clone())
    }

    fn add_constraint_instance(
        &mut self,
        name: &str,
        index: Option<&IndexTuple>,
        comparison: ResolvedComparison<VarRef>,
    ) -> Result<()> {
        let key = (name.to_string(), index.cloned().unwrap_or_default());
        if !self.keys.insert(key) {
            return Err(CompileError::Target(format!(
                "constraint `{}` already has an instance at [{}]",
                name,
                index.map(|i| format_index(i)).unwrap_or_default()
            )));
        }
        self.constraints.push(ConstraintRecord {
            name: name.to_string(),
            index: index.cloned(),
            comparison,
        });
        Ok(())
    }

    fn set_objective(&mut self, name: &str, expr: Resolved<VarRef>, sense: Sense) -> Result<()> {
        self.objective = Some(ObjectiveRecord {
            name: name.to_string(),
            expr,
            sense,
        });
        Ok(())
    }
}

impl fmt::Display for SymbolicModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for family in self.families.iter() {
            let variable = &family.variable;
            write!(f, "var {}", variable.name())?;
            if variable.dimension() > 0 {
                write!(f, "[{}]", variable.indices().join(", "))?;
            }
            writeln!(f, " in {} ({} members)", variable.domain(), family.members.len())?;
        }
        for record in &self.constraints {
            writeln!(f, "{}", record)?;
        }
        if let Some(objective) = &self.objective {
            writeln!(f, "{} {}: {}", objective.sense, objective.name, objective.expr)?;
        }
        Ok(())
    }
}
