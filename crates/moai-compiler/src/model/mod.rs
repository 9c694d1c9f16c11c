//! The model registry and the compile driver.

#[cfg(test)]
mod tests;

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use moai_config::{CompilerConfig, EnvironmentMode};
use moai_core::{format_index, CompileError, Parameter, Result, Set, Variable};

use crate::constraint::{Constraint, Objective};
use crate::context::IndexContext;
use crate::document::ModelData;
use crate::eval::{eval_expr, EvalContext};
use crate::expand::{expand_constraint, ConstraintExpansion};
use crate::expr::Expr;
use crate::registry::NamedList;
use crate::target::TargetModel;

/// A declarative optimization model.
///
/// Declarations are stored by name in insertion order; adding one whose
/// name already exists replaces it in place. Each `add_*` checks the new
/// declaration first, so a failed add leaves the model unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    name: String,
    sets: NamedList<Set>,
    parameters: NamedList<Parameter>,
    variables: NamedList<Variable>,
    constraints: NamedList<Constraint>,
    objective: Option<Objective>,
}

/// Per-constraint outcome of a compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintReport {
    pub name: String,
    pub instances: usize,
    /// Combinations rejected by a quantifier condition.
    pub skipped: u64,
}

/// Summary of a successful compile.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileReport {
    pub constraints: Vec<ConstraintReport>,
    pub variables: usize,
    /// Top-level terms in the compiled objective.
    pub objective_terms: usize,
    pub duration: Duration,
}

impl CompileReport {
    pub fn total_instances(&self) -> usize {
        self.constraints.iter().map(|c| c.instances).sum()
    }

    pub fn total_skipped(&self) -> u64 {
        self.constraints.iter().map(|c| c.skipped).sum()
    }

    pub fn constraint(&self, name: &str) -> Option<&ConstraintReport> {
        self.constraints.iter().find(|c| c.name == name)
    }
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sets: NamedList::new(),
            parameters: NamedList::new(),
            variables: NamedList::new(),
            constraints: NamedList::new(),
            objective: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // Registry mutation

    pub fn add_set(&mut self, set: Set) -> Result<&mut Self> {
        set.validate()?;
        self.sets.upsert(set);
        Ok(self)
    }

    pub fn add_parameter(&mut self, parameter: Parameter) -> Result<&mut Self> {
        self.check_set_names(parameter.indices())?;
        self.parameters.upsert(parameter);
        Ok(self)
    }

    pub fn add_variable(&mut self, variable: Variable) -> Result<&mut Self> {
        self.check_set_names(variable.indices())?;
        self.variables.upsert(variable);
        Ok(self)
    }

    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<&mut Self> {
        self.check_constraint(&constraint)?;
        self.constraints.upsert(constraint);
        Ok(self)
    }

    /// Sets the objective, replacing any previous one.
    pub fn set_objective(&mut self, objective: Objective) -> Result<&mut Self> {
        objective.expr().validate()?;
        self.check_expr_sets(objective.expr())?;
        self.objective = Some(objective);
        Ok(self)
    }

    pub fn remove_set(&mut self, name: &str) -> Option<Set> {
        self.sets.remove(name)
    }

    pub fn remove_parameter(&mut self, name: &str) -> Option<Parameter> {
        self.parameters.remove(name)
    }

    pub fn remove_variable(&mut self, name: &str) -> Option<Variable> {
        self.variables.remove(name)
    }

    pub fn remove_constraint(&mut self, name: &str) -> Option<Constraint> {
        self.constraints.remove(name)
    }

    pub fn remove_objective(&mut self) -> Option<Objective> {
        self.objective.take()
    }

    // Lookups

    pub fn set(&self, name: &str) -> Option<&Set> {
        self.sets.get(name)
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.get(name)
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    pub fn sets(&self) -> &NamedList<Set> {
        &self.sets
    }

    pub fn parameters(&self) -> &NamedList<Parameter> {
        &self.parameters
    }

    pub fn variables(&self) -> &NamedList<Variable> {
        &self.variables
    }

    pub fn constraints(&self) -> &NamedList<Constraint> {
        &self.constraints
    }

    pub fn set_names(&self) -> Vec<&str> {
        self.sets.names()
    }

    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.names()
    }

    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.names()
    }

    pub fn constraint_names(&self) -> Vec<&str> {
        self.constraints.names()
    }

    /// Re-checks every declaration against the current registry.
    ///
    /// Removing a set can leave other declarations pointing at it; this
    /// finds those before compiling.
    pub fn validate(&self) -> Result<()> {
        for set in &self.sets {
            set.validate()?;
        }
        for parameter in &self.parameters {
            self.check_set_names(parameter.indices())?;
        }
        for variable in &self.variables {
            self.check_set_names(variable.indices())?;
        }
        for constraint in &self.constraints {
            self.check_constraint(constraint)?;
        }
        if let Some(objective) = &self.objective {
            objective.expr().validate()?;
            self.check_expr_sets(objective.expr())?;
        }
        Ok(())
    }

    // Document conversion

    pub fn to_data(&self) -> ModelData {
        ModelData {
            name: self.name.clone(),
            sets: self.sets.iter().cloned().collect(),
            parameters: self.parameters.iter().cloned().collect(),
            variables: self.variables.iter().cloned().collect(),
            constraints: self.constraints.iter().cloned().collect(),
            objective: self.objective.clone(),
        }
    }

    /// Builds a model from a document, running every `add_*` check.
    pub fn from_data(data: ModelData) -> Result<Self> {
        let mut model = Model::new(data.name);
        for set in data.sets {
            model.add_set(set)?;
        }
        for parameter in data.parameters {
            model.add_parameter(parameter)?;
        }
        for variable in data.variables {
            model.add_variable(variable)?;
        }
        for constraint in data.constraints {
            model.add_constraint(constraint)?;
        }
        if let Some(objective) = data.objective {
            model.set_objective(objective)?;
        }
        Ok(model)
    }

    // Compilation

    /// Evaluation view over this model's declarations.
    pub fn eval_context<'a, T: TargetModel>(
        &'a self,
        target: &'a T,
        config: &CompilerConfig,
    ) -> EvalContext<'a, T> {
        EvalContext::new(&self.sets, &self.parameters, &self.variables, target)
            .with_limits(config.limits)
    }

    /// Compiles the model into `target`.
    ///
    /// Declarations are emitted first so the target can hand out
    /// variable handles. Every constraint and the objective are then
    /// evaluated in full before any of them is emitted: on error the
    /// target has received declarations but no constraint instance and
    /// no objective.
    pub fn compile<T: TargetModel>(
        &self,
        target: &mut T,
        config: &CompilerConfig,
    ) -> Result<CompileReport> {
        let start = Instant::now();

        let objective = self
            .objective
            .as_ref()
            .ok_or_else(|| CompileError::MissingObjective {
                name: self.name.clone(),
            })?;
        if config.environment_mode == EnvironmentMode::Checked {
            self.validate()?;
        }

        info!(
            event = "compile_start",
            model = %self.name,
            set_count = self.sets.len(),
            parameter_count = self.parameters.len(),
            variable_count = self.variables.len(),
            constraint_count = self.constraints.len(),
        );

        self.declare(target)?;

        let ctx = self.eval_context(&*target, config);
        let mut expansions: Vec<(&Constraint, ConstraintExpansion<T::Var>)> =
            Vec::with_capacity(self.constraints.len());
        for constraint in &self.constraints {
            let expansion = expand_constraint(constraint, &ctx)?;
            info!(
                event = "constraint_expanded",
                constraint = constraint.name(),
                instances = expansion.instances.len(),
                skipped = expansion.skipped,
            );
            expansions.push((constraint, expansion));
        }

        let root = IndexContext::root();
        let objective_value = eval_expr(objective.expr(), &ctx, &root)?;
        let objective_terms = objective_value
            .as_symbolic()
            .map_or(1, |expr| expr.term_count());
        info!(
            event = "objective_compiled",
            objective = objective.name(),
            sense = %objective.sense(),
            terms = objective_terms,
        );

        let mut reports = Vec::with_capacity(expansions.len());
        for (constraint, expansion) in expansions {
            reports.push(ConstraintReport {
                name: constraint.name().to_string(),
                instances: expansion.instances.len(),
                skipped: expansion.skipped,
            });
            for instance in expansion.instances {
                if config.environment_mode == EnvironmentMode::Checked && instance.comparison.is_host() {
                    warn!(
                        constraint = constraint.name(),
                        index = %instance.index.as_deref().map(format_index).unwrap_or_default(),
                        "constraint instance references no decision variable"
                    );
                }
                target.add_constraint_instance(
                    constraint.name(),
                    instance.index.as_ref(),
                    instance.comparison,
                )?;
            }
        }
        target.set_objective(objective.name(), objective_value, objective.sense())?;

        let report = CompileReport {
            constraints: reports,
            variables: self.variables.len(),
            objective_terms,
            duration: start.elapsed(),
        };
        info!(
            event = "compile_end",
            model = %self.name,
            instances = report.total_instances(),
            skipped = report.total_skipped(),
            duration_ms = report.duration.as_millis() as u64,
        );
        Ok(report)
    }

    /// Emits sets, parameters and variable families in declaration order.
    fn declare<T: TargetModel>(&self, target: &mut T) -> Result<()> {
        for set in &self.sets {
            target.declare_set(set)?;
        }
        for parameter in &self.parameters {
            target.declare_parameter(parameter)?;
        }
        for variable in &self.variables {
            let index_sets = variable
                .indices()
                .iter()
                .map(|name| self.lookup_set(name))
                .collect::<Result<Vec<_>>>()?;
            debug!(variable = variable.name(), dimension = variable.dimension(), "declaring variable family");
            target.declare_variable_family(variable, &index_sets)?;
        }
        Ok(())
    }

    fn lookup_set(&self, name: &str) -> Result<&Set> {
        self.sets.get(name).ok_or_else(|| CompileError::UnknownSet {
            name: name.to_string(),
        })
    }

    fn check_set_names(&self, names: &[String]) -> Result<()> {
        names.iter().try_for_each(|name| self.lookup_set(name).map(|_| ()))
    }

    fn check_constraint(&self, constraint: &Constraint) -> Result<()> {
        constraint.validate()?;
        for quantifier in constraint.quantifiers() {
            self.lookup_set(&quantifier.over)?;
            if let Some(condition) = &quantifier.condition {
                self.check_expr_sets(&condition.left)?;
                self.check_expr_sets(&condition.right)?;
            }
        }
        self.check_expr_sets(&constraint.expr().left)?;
        self.check_expr_sets(&constraint.expr().right)
    }

    /// Checks the sets named by aggregation bindings anywhere in `expr`.
    fn check_expr_sets(&self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Number { .. } | Expr::String { .. } | Expr::IndexVariable { .. } => Ok(()),
            Expr::Variable { index_expr, .. } | Expr::Parameter { index_expr, .. } => index_expr
                .iter()
                .flatten()
                .try_for_each(|position| self.check_expr_sets(position)),
            Expr::UnaryOp { expr, .. } => self.check_expr_sets(expr),
            Expr::BinaryOp { left, right, .. } => {
                self.check_expr_sets(left)?;
                self.check_expr_sets(right)
            }
            Expr::Aggregation(agg) => {
                for binding in &agg.bindings {
                    self.lookup_set(binding.set_name())?;
                }
                if let Some(condition) = &agg.condition {
                    self.check_expr_sets(&condition.left)?;
                    self.check_expr_sets(&condition.right)?;
                }
                self.check_expr_sets(&agg.expr)
            }
        }
    }
}
