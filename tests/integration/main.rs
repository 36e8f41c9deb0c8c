mod backtest_test;
mod config_test;
mod execution_test;
mod scenario_test;
